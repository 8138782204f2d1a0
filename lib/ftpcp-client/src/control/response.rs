/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tokio::io::{AsyncRead, AsyncWrite};

use super::FtpControlChannel;
use crate::error::FtpRawResponseError;
use crate::io::LimitedBufReadExt;

#[derive(Debug)]
pub(crate) enum FtpRawResponse {
    SingleLine(u16, String),
    MultiLine(u16, Vec<String>),
}

macro_rules! char_to_u16 {
    ($c:expr) => {
        ($c - b'0') as u16
    };
}

fn parse_reply_code(line: &[u8]) -> Result<u16, FtpRawResponseError> {
    if !line[..3].iter().all(|c| c.is_ascii_digit()) {
        return Err(FtpRawResponseError::InvalidLineFormat);
    }
    let code = char_to_u16!(line[0]) * 100 + char_to_u16!(line[1]) * 10 + char_to_u16!(line[2]);
    if !(100..600).contains(&code) {
        return Err(FtpRawResponseError::InvalidReplyCode(code));
    }
    Ok(code)
}

impl FtpRawResponse {
    fn parse_single_line(line: &[u8]) -> Result<Self, FtpRawResponseError> {
        let code = parse_reply_code(line)?;
        let msg =
            std::str::from_utf8(&line[4..]).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
        Ok(FtpRawResponse::SingleLine(code, msg.trim_end().to_string()))
    }

    fn get_multi_line_parser(
        line: &[u8],
        max_lines: usize,
    ) -> Result<FtpMultiLineReplyParser, FtpRawResponseError> {
        let code = parse_reply_code(line)?;
        let code_prefix = [line[0], line[1], line[2]];
        let mut lines = Vec::<String>::with_capacity(max_lines.min(16));
        let msg =
            std::str::from_utf8(&line[4..]).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
        lines.push(msg.trim_end().to_string());
        Ok(FtpMultiLineReplyParser {
            code,
            code_prefix,
            lines,
        })
    }

    pub(crate) fn code(&self) -> u16 {
        match self {
            FtpRawResponse::SingleLine(code, _) => *code,
            FtpRawResponse::MultiLine(code, _) => *code,
        }
    }

    pub(crate) fn parse_pasv_227_reply(&self) -> Option<SocketAddr> {
        let line = match self {
            FtpRawResponse::SingleLine(_, line) => line,
            FtpRawResponse::MultiLine(_, _) => return None,
        };

        let p_start = memchr::memchr(b'(', line.as_bytes())?;
        let p_end = memchr::memchr(b')', &line.as_bytes()[p_start..])? + p_start;

        let a: Vec<&str> = line[p_start + 1..p_end].split(',').collect();
        if a.len() != 6 {
            return None;
        }

        let h1 = u8::from_str(a[0]).ok()?;
        let h2 = u8::from_str(a[1]).ok()?;
        let h3 = u8::from_str(a[2]).ok()?;
        let h4 = u8::from_str(a[3]).ok()?;
        let p1 = u8::from_str(a[4]).ok()?;
        let p2 = u8::from_str(a[5]).ok()?;

        let ip = IpAddr::V4(Ipv4Addr::new(h1, h2, h3, h4));
        let port = ((p1 as u16) << 8) + (p2 as u16);
        Some(SocketAddr::new(ip, port))
    }
}

struct FtpMultiLineReplyParser {
    code: u16,
    code_prefix: [u8; 3],
    lines: Vec<String>,
}

impl FtpMultiLineReplyParser {
    /// The reply is closed by a line carrying the same code with a non-`-`
    /// 4th byte; everything else is a continuation kept verbatim (leading
    /// whitespace matters in listings embedded in replies).
    fn feed_line(&mut self, line: &[u8]) -> Result<bool, FtpRawResponseError> {
        if line.len() > 4 && line.starts_with(&self.code_prefix) && line[3] != b'-' {
            let msg =
                std::str::from_utf8(&line[4..]).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
            self.lines.push(msg.trim_end().to_string());
            Ok(true)
        } else {
            let msg = std::str::from_utf8(line).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
            self.lines.push(msg.trim_end().to_string());
            Ok(false)
        }
    }

    fn finish(self) -> FtpRawResponse {
        FtpRawResponse::MultiLine(self.code, self.lines)
    }
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn read_reply_line(
        &mut self,
        min_len: usize,
        buf: &mut Vec<u8>,
    ) -> Result<(), FtpRawResponseError> {
        buf.clear();

        let (found, len) = self
            .stream
            .limited_read_until(b'\n', self.config.max_line_len, buf)
            .await
            .map_err(FtpRawResponseError::ReadFailed)?;
        if len == 0 {
            return Err(FtpRawResponseError::ConnectionClosed);
        }

        crate::debug::log_rsp(String::from_utf8_lossy(buf).trim_end());

        if !found {
            Err(FtpRawResponseError::LineTooLong)
        } else if len < min_len {
            Err(FtpRawResponseError::InvalidLineFormat)
        } else {
            Ok(())
        }
    }

    pub(super) async fn read_raw_response(
        &mut self,
    ) -> Result<FtpRawResponse, FtpRawResponseError> {
        let mut buf = Vec::<u8>::with_capacity(self.config.max_line_len);
        // at least <code>\n
        self.read_reply_line(5, &mut buf).await?;

        match buf[3] {
            b'-' => {
                let mut ml_parser =
                    FtpRawResponse::get_multi_line_parser(&buf, self.config.max_multi_lines)?;
                for _ in 0..self.config.max_multi_lines {
                    // at least "\n"
                    self.read_reply_line(2, &mut buf).await?;
                    let end = ml_parser.feed_line(&buf)?;
                    if end {
                        return Ok(ml_parser.finish());
                    }
                }
                Err(FtpRawResponseError::TooManyLines)
            }
            _ => FtpRawResponse::parse_single_line(&buf),
        }
    }

    pub(super) async fn timed_read_raw_response(
        &mut self,
        stage: &'static str,
    ) -> Result<FtpRawResponse, FtpRawResponseError> {
        match tokio::time::timeout(self.config.command_timeout, self.read_raw_response()).await {
            Ok(r) => r,
            Err(_) => Err(FtpRawResponseError::ReadResponseTimedOut(stage)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FtpControlConfig;

    fn channel_over(data: &'static [u8]) -> FtpControlChannel<tokio_test::io::Mock> {
        let stream = tokio_test::io::Builder::new().read(data).build();
        FtpControlChannel::new(stream, FtpControlConfig::default())
    }

    #[tokio::test]
    async fn single_line_reply() {
        let mut channel = channel_over(b"220 service ready\r\n");
        let rsp = channel.read_raw_response().await.unwrap();
        assert_eq!(rsp.code(), 220);
        match rsp {
            FtpRawResponse::SingleLine(_, msg) => assert_eq!(msg, "service ready"),
            _ => panic!("expected single line reply"),
        }
    }

    #[tokio::test]
    async fn bare_code_reply() {
        let mut channel = channel_over(b"220\r\n");
        let rsp = channel.read_raw_response().await.unwrap();
        assert_eq!(rsp.code(), 220);
    }

    #[tokio::test]
    async fn multi_line_reply() {
        let mut channel = channel_over(
            b"211-Features:\r\n MDTM\r\n SIZE\r\n211 End\r\n",
        );
        let rsp = channel.read_raw_response().await.unwrap();
        assert_eq!(rsp.code(), 211);
        match rsp {
            FtpRawResponse::MultiLine(_, lines) => {
                assert_eq!(lines.len(), 4);
                assert_eq!(lines[0], "Features:");
                // continuation lines keep their leading whitespace
                assert_eq!(lines[1], " MDTM");
                assert_eq!(lines[3], "End");
            }
            _ => panic!("expected multi line reply"),
        }
    }

    #[tokio::test]
    async fn multi_line_ignores_other_codes() {
        let mut channel = channel_over(b"230-Welcome\r\n220 not the end\r\n230 done\r\n");
        let rsp = channel.read_raw_response().await.unwrap();
        assert_eq!(rsp.code(), 230);
        match rsp {
            FtpRawResponse::MultiLine(_, lines) => {
                assert_eq!(lines[1], "220 not the end");
                assert_eq!(lines[2], "done");
            }
            _ => panic!("expected multi line reply"),
        }
    }

    #[tokio::test]
    async fn invalid_reply_code() {
        let mut channel = channel_over(b"999 out of range\r\n");
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::InvalidReplyCode(999))
        ));

        let mut channel = channel_over(b"hello there\r\n");
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::InvalidLineFormat)
        ));
    }

    #[tokio::test]
    async fn closed_while_waiting() {
        let mut channel = channel_over(b"");
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn too_many_continuation_lines() {
        let mut config = FtpControlConfig::default();
        config.max_multi_lines = 2;
        let stream = tokio_test::io::Builder::new()
            .read(b"230-a\r\nb\r\nc\r\nd\r\n230 end\r\n")
            .build();
        let mut channel = FtpControlChannel::new(stream, config);
        assert!(matches!(
            channel.read_raw_response().await,
            Err(FtpRawResponseError::TooManyLines)
        ));
    }

    #[test]
    fn pasv_reply_well_formed() {
        let rsp = FtpRawResponse::SingleLine(
            227,
            "Entering Passive Mode (10,0,0,1,4,1)".to_string(),
        );
        let addr = rsp.parse_pasv_227_reply().unwrap();
        assert_eq!(addr.ip().to_string(), "10.0.0.1");
        assert_eq!(addr.port(), 4 * 256 + 1);
    }

    #[test]
    fn pasv_reply_malformed() {
        for msg in [
            "Entering Passive Mode 10,0,0,1,4,1",
            "Entering Passive Mode (10,0,0,1,4)",
            "Entering Passive Mode (10,0,0,1,4,1,9)",
            "Entering Passive Mode (300,0,0,1,4,1)",
            "Entering Passive Mode (10,0,0,one,4,1)",
            "Entering Passive Mode ()",
        ] {
            let rsp = FtpRawResponse::SingleLine(227, msg.to_string());
            assert!(rsp.parse_pasv_227_reply().is_none(), "accepted: {msg}");
        }
    }
}
