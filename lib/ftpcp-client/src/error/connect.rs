/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::io;

use thiserror::Error;

use crate::error::FtpCommandError;

#[derive(Debug, Error)]
pub enum FtpConnectError {
    #[error("connect failed: {0:?}")]
    ConnectIoError(io::Error),
    #[error("timed out to connect")]
    ConnectTimedOut,
    #[error("timed out to receive greetings")]
    GreetingTimedOut,
    #[error("greeting failed: {0}")]
    GreetingFailed(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
}
