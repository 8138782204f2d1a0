/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::future::poll_fn;
use std::io;
use std::pin::Pin;
use std::task::{Poll, ready};

use tokio::io::AsyncBufRead;

pub(crate) trait LimitedBufReadExt: AsyncBufRead + Unpin {
    /// Read until `delimiter` is seen or `max_len` bytes have been appended
    /// to `buf`. Returns (delimiter found, bytes appended); zero bytes
    /// appended without the delimiter means the stream hit EOF.
    async fn limited_read_until(
        &mut self,
        delimiter: u8,
        max_len: usize,
        buf: &mut Vec<u8>,
    ) -> io::Result<(bool, usize)>;

    /// Wait until the stream is readable. Returns false if it is readable
    /// only because the peer closed.
    async fn fill_wait_data(&mut self) -> io::Result<bool>;
}

impl<R: AsyncBufRead + Unpin + ?Sized> LimitedBufReadExt for R {
    async fn limited_read_until(
        &mut self,
        delimiter: u8,
        max_len: usize,
        buf: &mut Vec<u8>,
    ) -> io::Result<(bool, usize)> {
        let mut read = 0usize;
        poll_fn(|cx| {
            loop {
                let available = ready!(Pin::new(&mut *self).poll_fill_buf(cx))?;
                if available.is_empty() {
                    return Poll::Ready(Ok((false, read)));
                }

                let allowed = max_len - read;
                let (found, used) = match memchr::memchr(delimiter, available) {
                    Some(i) if i < allowed => (true, i + 1),
                    _ => (false, available.len().min(allowed)),
                };
                buf.extend_from_slice(&available[..used]);
                Pin::new(&mut *self).consume(used);
                read += used;

                if found {
                    return Poll::Ready(Ok((true, read)));
                }
                if read >= max_len {
                    return Poll::Ready(Ok((false, read)));
                }
            }
        })
        .await
    }

    async fn fill_wait_data(&mut self) -> io::Result<bool> {
        poll_fn(|cx| {
            let available = ready!(Pin::new(&mut *self).poll_fill_buf(cx))?;
            Poll::Ready(Ok(!available.is_empty()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn read_single_line() {
        let mut reader = BufReader::new(&b"220 ready\r\nmore"[..]);
        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 64, &mut buf).await.unwrap();
        assert!(found);
        assert_eq!(nr, 11);
        assert_eq!(buf.as_slice(), b"220 ready\r\n");
    }

    #[tokio::test]
    async fn read_eof() {
        let mut reader = BufReader::new(&b""[..]);
        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 64, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(nr, 0);
    }

    #[tokio::test]
    async fn read_line_too_long() {
        let mut reader = BufReader::new(&b"0123456789\n"[..]);
        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 4, &mut buf).await.unwrap();
        assert!(!found);
        assert_eq!(nr, 4);
        assert_eq!(buf.as_slice(), b"0123");
    }

    #[tokio::test]
    async fn read_across_chunks() {
        let stream = tokio_test::io::Builder::new()
            .read(b"150 op")
            .read(b"ening\r\n")
            .build();
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let (found, nr) = reader.limited_read_until(b'\n', 64, &mut buf).await.unwrap();
        assert!(found);
        assert_eq!(nr, 13);
        assert_eq!(buf.as_slice(), b"150 opening\r\n");
    }

    #[tokio::test]
    async fn wait_data() {
        let mut reader = BufReader::new(&b"x"[..]);
        assert!(reader.fill_wait_data().await.unwrap());
        let mut reader = BufReader::new(&b""[..]);
        assert!(!reader.fill_wait_data().await.unwrap());
    }
}
