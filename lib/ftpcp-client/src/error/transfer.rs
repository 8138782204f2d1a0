/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::io;

use thiserror::Error;

use super::{FtpCommandError, FtpRawResponseError};
use crate::control::FtpCommand;

#[derive(Debug, Error)]
pub enum FtpTransferSetupError {
    #[error("command error: {0}")]
    CommandError(FtpCommandError),
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("data connect failed: {0:?}")]
    DataConnectFailed(io::Error),
    #[error("timed out to connect data channel")]
    DataConnectTimedOut,
}

impl From<FtpCommandError> for FtpTransferSetupError {
    fn from(e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::ServiceNotAvailable => FtpTransferSetupError::ServiceNotAvailable,
            _ => FtpTransferSetupError::CommandError(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum FtpTransferServerError {
    #[error("unable to recv reply: {0}")]
    RecvFailed(#[from] FtpRawResponseError),
    #[error("data transfer connection was not established")]
    DataTransferNotEstablished,
    #[error("data transfer connection was lost")]
    DataTransferLost,
    #[error("server failed to process the transfer")]
    ServerFailed,
    #[error("page type unknown")]
    PageTypeUnknown,
    #[error("exceeded storage allocation")]
    ExceededStorageAllocation,
    #[error("unexpected end reply code ({0} -> {1})")]
    UnexpectedEndReplyCode(FtpCommand, u16),
}

#[derive(Debug, Error)]
pub enum FtpLineDataReadError {
    #[error("read failed: {0:?}")]
    ReadFailed(#[from] io::Error),
    #[error("line {0} is too long")]
    LineTooLong(usize),
    #[error("too many lines")]
    TooManyLines,
    #[error("unsupported encoding")]
    UnsupportedEncoding,
    #[error("aborted by callback")]
    AbortedByCallback,
}
