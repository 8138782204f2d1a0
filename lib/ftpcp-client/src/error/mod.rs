/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

mod response;
pub use response::FtpRawResponseError;

mod command;
pub use command::FtpCommandError;

mod connect;
pub use connect::FtpConnectError;

mod session;
pub(crate) use session::FtpAuthStatus;
pub use session::FtpSessionOpenError;

mod transfer;
pub use transfer::{FtpLineDataReadError, FtpTransferServerError, FtpTransferSetupError};

mod file;
pub use file::{
    FtpFileListError, FtpFileRetrieveError, FtpFileRetrieveStartError, FtpFileStatError,
    FtpFileStoreError, FtpFileStoreStartError,
};
