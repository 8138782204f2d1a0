/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FtpServerAddrParseError {
    #[error("empty host")]
    EmptyHost,
    #[error("invalid port: {0}")]
    InvalidPort(String),
}

/// Resolved control connection target. Port 0 means unset, callers are
/// expected to fill in the protocol default before connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpServerAddr {
    host: String,
    port: u16,
}

impl FtpServerAddr {
    pub fn new(host: String, port: u16) -> Self {
        FtpServerAddr { host, port }
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }
}

impl fmt::Display for FtpServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for FtpServerAddr {
    type Err = FtpServerAddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FtpServerAddrParseError::EmptyHost);
        }
        match s.rsplit_once(':') {
            Some((host, port)) if !port.contains(':') => {
                if host.is_empty() {
                    return Err(FtpServerAddrParseError::EmptyHost);
                }
                let port = u16::from_str(port)
                    .map_err(|_| FtpServerAddrParseError::InvalidPort(port.to_string()))?;
                Ok(FtpServerAddr::new(host.to_string(), port))
            }
            _ => Ok(FtpServerAddr::new(s.to_string(), 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_only() {
        let addr = FtpServerAddr::from_str("ftp.example.net").unwrap();
        assert_eq!(addr.host(), "ftp.example.net");
        assert_eq!(addr.port(), 0);
    }

    #[test]
    fn parse_host_port() {
        let addr = FtpServerAddr::from_str("127.0.0.1:2121").unwrap();
        assert_eq!(addr.host(), "127.0.0.1");
        assert_eq!(addr.port(), 2121);
        assert_eq!(addr.to_string(), "127.0.0.1:2121");
    }

    #[test]
    fn parse_invalid() {
        assert!(FtpServerAddr::from_str("").is_err());
        assert!(FtpServerAddr::from_str(":21").is_err());
        assert!(FtpServerAddr::from_str("host:http").is_err());
    }
}
