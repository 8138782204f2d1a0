/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::time::Duration;

#[derive(Clone)]
pub struct FtpControlConfig {
    pub max_line_len: usize,
    pub max_multi_lines: usize,
    pub command_timeout: Duration,
}

impl Default for FtpControlConfig {
    fn default() -> Self {
        FtpControlConfig {
            max_line_len: 512,
            max_multi_lines: 128,
            command_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct FtpTransferConfig {
    pub list_max_line_len: usize,
    pub list_max_entries: usize,
    pub list_all_timeout: Duration,
    pub end_wait_timeout: Duration,
}

impl Default for FtpTransferConfig {
    fn default() -> Self {
        FtpTransferConfig {
            list_max_line_len: 2048,
            list_max_entries: 65536,
            list_all_timeout: Duration::from_secs(300),
            end_wait_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct FtpClientConfig {
    pub control: FtpControlConfig,
    pub transfer: FtpTransferConfig,
    pub connect_timeout: Duration,
    pub greeting_timeout: Duration,
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        FtpClientConfig {
            control: FtpControlConfig::default(),
            transfer: FtpTransferConfig::default(),
            connect_timeout: Duration::from_secs(30),
            greeting_timeout: Duration::from_secs(60),
        }
    }
}
