/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, BufStream};

use crate::config::FtpControlConfig;
use crate::error::{
    FtpAuthStatus, FtpCommandError, FtpFileRetrieveStartError, FtpFileStatError,
    FtpFileStoreStartError, FtpRawResponseError, FtpTransferServerError,
};
use crate::io::LimitedBufReadExt;
use crate::transfer::FtpTransferType;

mod response;

mod command;
pub(crate) use command::FtpCommand;

pub(crate) struct FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite,
{
    config: FtpControlConfig,
    stream: BufStream<T>,
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: T, config: FtpControlConfig) -> Self {
        FtpControlChannel {
            config,
            stream: BufStream::new(stream),
        }
    }

    pub(crate) async fn wait_read_ready(&mut self) -> Result<(), FtpRawResponseError> {
        match self.stream.fill_wait_data().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(FtpRawResponseError::ConnectionClosed),
            Err(e) => Err(FtpRawResponseError::ReadFailed(e)),
        }
    }

    pub(crate) async fn wait_greetings(&mut self) -> Result<(), FtpCommandError> {
        loop {
            let reply = self.read_raw_response().await?;
            return match reply.code() {
                120 => continue,
                220 => Ok(()),
                421 => Err(FtpCommandError::ServiceNotAvailable),
                n => Err(FtpCommandError::UnexpectedReplyCode(
                    FtpCommand::GREETING,
                    n,
                )),
            };
        }
    }

    pub(crate) async fn send_username(
        &mut self,
        name: Option<&str>,
    ) -> Result<FtpAuthStatus, FtpCommandError> {
        let cmd = FtpCommand::USER;
        let username = name.unwrap_or("anonymous");
        self.send_cmd1(cmd, username)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("send username").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            530 => Ok(FtpAuthStatus::NotLoggedIn),
            230 => Ok(FtpAuthStatus::LoggedIn),
            331 => Ok(FtpAuthStatus::NeedPassword),
            332 => Ok(FtpAuthStatus::NeedAccount),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn send_password(
        &mut self,
        pass: Option<&str>,
    ) -> Result<FtpAuthStatus, FtpCommandError> {
        let cmd = FtpCommand::PASS;
        let password = pass.unwrap_or("");
        self.send_cmd1(cmd, password)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("send password").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            503 => Err(FtpCommandError::BadCommandSequence(cmd)),
            530 => Ok(FtpAuthStatus::NotLoggedIn),
            202 => Err(FtpCommandError::CommandNotImplemented(cmd)), // not fatal but unexpected
            230 => Ok(FtpAuthStatus::LoggedIn),
            332 => Ok(FtpAuthStatus::NeedAccount),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn send_quit(&mut self) -> Result<(), FtpCommandError> {
        let cmd = FtpCommand::QUIT;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("send quit").await?;
        match reply.code() {
            500 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            221 => Ok(()),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn request_transfer_type(
        &mut self,
        t: FtpTransferType,
    ) -> Result<(), FtpCommandError> {
        let cmd = match t {
            FtpTransferType::Ascii => FtpCommand::TYPE_A,
            FtpTransferType::Image => FtpCommand::TYPE_I,
        };
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("request transfer type")
            .await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            504 => Err(FtpCommandError::ParameterNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            200 => Ok(()),
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn request_pasv_port(&mut self) -> Result<SocketAddr, FtpCommandError> {
        let cmd = FtpCommand::PASV;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response("request pasv port").await?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd)),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd)),
            530 => Err(FtpCommandError::NotLoggedIn),
            227 => match reply.parse_pasv_227_reply() {
                Some(addr) => Ok(addr),
                None => Err(FtpCommandError::InvalidReplySyntax(cmd, 227)),
            },
            421 => Err(FtpCommandError::ServiceNotAvailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n)),
        }
    }

    pub(crate) async fn make_dir(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        let cmd = FtpCommand::MKD;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("make dir")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            550 => Err(FtpFileStatError::FileUnavailable),
            257 => Ok(()),
            421 => Err(FtpFileStatError::ServiceNotAvailable),
            450 => Err(FtpFileStatError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn remove_dir(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        let cmd = FtpCommand::RMD;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("remove dir")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            550 => Err(FtpFileStatError::FileUnavailable),
            250 => Ok(()),
            421 => Err(FtpFileStatError::ServiceNotAvailable),
            450 => Err(FtpFileStatError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn delete_file(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        let cmd = FtpCommand::DELE;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("delete file")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            550 => Err(FtpFileStatError::FileUnavailable),
            250 => Ok(()),
            421 => Err(FtpFileStatError::ServiceNotAvailable),
            450 => Err(FtpFileStatError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn start_list(&mut self, path: &str) -> Result<(), FtpFileRetrieveStartError> {
        let cmd = FtpCommand::LIST;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("start list")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            502 => Err(FtpCommandError::CommandNotImplemented(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            125 | 150 => Ok(()),
            421 => Err(FtpFileRetrieveStartError::ServiceNotAvailable),
            450 => Err(FtpFileRetrieveStartError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn wait_list(&mut self) -> Result<(), FtpTransferServerError> {
        let reply = self.read_raw_response().await?;
        match reply.code() {
            226 | 250 => Ok(()),
            425 => Err(FtpTransferServerError::DataTransferNotEstablished),
            426 => Err(FtpTransferServerError::DataTransferLost),
            451 => Err(FtpTransferServerError::ServerFailed),
            n => Err(FtpTransferServerError::UnexpectedEndReplyCode(
                FtpCommand::LIST,
                n,
            )),
        }
    }

    pub(crate) async fn start_retrieve(
        &mut self,
        path: &str,
    ) -> Result<(), FtpFileRetrieveStartError> {
        let cmd = FtpCommand::RETR;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("start retrieve")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            550 => Err(FtpFileRetrieveStartError::FileUnavailable),
            125 | 150 => Ok(()),
            421 => Err(FtpFileRetrieveStartError::ServiceNotAvailable),
            450 => Err(FtpFileRetrieveStartError::FileUnavailable),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn wait_retrieve(&mut self) -> Result<(), FtpTransferServerError> {
        let reply = self.read_raw_response().await?;
        match reply.code() {
            226 | 250 => Ok(()),
            425 => Err(FtpTransferServerError::DataTransferNotEstablished),
            426 => Err(FtpTransferServerError::DataTransferLost),
            451 => Err(FtpTransferServerError::ServerFailed),
            n => Err(FtpTransferServerError::UnexpectedEndReplyCode(
                FtpCommand::RETR,
                n,
            )),
        }
    }

    pub(crate) async fn start_store(&mut self, path: &str) -> Result<(), FtpFileStoreStartError> {
        let cmd = FtpCommand::STOR;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self
            .timed_read_raw_response("start store")
            .await
            .map_err(FtpCommandError::RecvFailed)?;
        match reply.code() {
            500 | 501 => Err(FtpCommandError::RejectedCommandSyntax(cmd).into()),
            530 => Err(FtpCommandError::NotLoggedIn.into()),
            532 => Err(FtpFileStoreStartError::NeedAccountForStoring),
            553 => Err(FtpFileStoreStartError::FileNameNotAllowed),
            550 => Err(FtpFileStoreStartError::FileUnavailable),
            125 | 150 => Ok(()),
            421 => Err(FtpFileStoreStartError::ServiceNotAvailable),
            450 => Err(FtpFileStoreStartError::FileUnavailable),
            452 => Err(FtpFileStoreStartError::InsufficientStorageSpace),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, n).into()),
        }
    }

    pub(crate) async fn wait_store(&mut self) -> Result<(), FtpTransferServerError> {
        let reply = self.read_raw_response().await?;
        match reply.code() {
            226 | 250 => Ok(()),
            425 => Err(FtpTransferServerError::DataTransferNotEstablished),
            426 => Err(FtpTransferServerError::DataTransferLost),
            451 => Err(FtpTransferServerError::ServerFailed),
            551 => Err(FtpTransferServerError::PageTypeUnknown),
            552 => Err(FtpTransferServerError::ExceededStorageAllocation),
            n => Err(FtpTransferServerError::UnexpectedEndReplyCode(
                FtpCommand::STOR,
                n,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    fn channel(stream: tokio_test::io::Mock) -> FtpControlChannel<tokio_test::io::Mock> {
        FtpControlChannel::new(stream, FtpControlConfig::default())
    }

    #[tokio::test]
    async fn greeting_plain() {
        let stream = Builder::new().read(b"220 ProFTPD Server ready\r\n").build();
        channel(stream).wait_greetings().await.unwrap();
    }

    #[tokio::test]
    async fn greeting_delayed() {
        let stream = Builder::new()
            .read(b"120 service ready in a moment\r\n220 ready\r\n")
            .build();
        channel(stream).wait_greetings().await.unwrap();
    }

    #[tokio::test]
    async fn greeting_rejected() {
        let stream = Builder::new().read(b"500 go away\r\n").build();
        assert!(matches!(
            channel(stream).wait_greetings().await,
            Err(FtpCommandError::UnexpectedReplyCode(_, 500))
        ));
    }

    #[tokio::test]
    async fn username_needs_password() {
        let stream = Builder::new()
            .write(b"USER anonymous\r\n")
            .read(b"331 Password required\r\n")
            .build();
        assert!(matches!(
            channel(stream).send_username(None).await,
            Ok(FtpAuthStatus::NeedPassword)
        ));
    }

    #[tokio::test]
    async fn password_rejected() {
        let stream = Builder::new()
            .write(b"PASS secret\r\n")
            .read(b"530 Login incorrect\r\n")
            .build();
        assert!(matches!(
            channel(stream).send_password(Some("secret")).await,
            Ok(FtpAuthStatus::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn pasv_exchange() {
        let stream = Builder::new()
            .write(b"PASV\r\n")
            .read(b"227 Entering Passive Mode (192,168,1,9,195,89)\r\n")
            .build();
        let addr = channel(stream).request_pasv_port().await.unwrap();
        assert_eq!(addr.ip().to_string(), "192.168.1.9");
        assert_eq!(addr.port(), 195 * 256 + 89);
    }

    #[tokio::test]
    async fn pasv_malformed_reply() {
        let stream = Builder::new()
            .write(b"PASV\r\n")
            .read(b"227 no address here\r\n")
            .build();
        assert!(matches!(
            channel(stream).request_pasv_port().await,
            Err(FtpCommandError::InvalidReplySyntax(_, 227))
        ));
    }

    #[tokio::test]
    async fn delete_unavailable() {
        let stream = Builder::new()
            .write(b"DELE /pub/missing\r\n")
            .read(b"550 No such file\r\n")
            .build();
        assert!(matches!(
            channel(stream).delete_file("/pub/missing").await,
            Err(FtpFileStatError::FileUnavailable)
        ));
    }

    #[tokio::test]
    async fn make_dir_created() {
        let stream = Builder::new()
            .write(b"MKD /pub/incoming\r\n")
            .read(b"257 \"/pub/incoming\" created\r\n")
            .build();
        channel(stream).make_dir("/pub/incoming").await.unwrap();
    }

    #[tokio::test]
    async fn store_start_rejected_aborts() {
        let stream = Builder::new()
            .write(b"STOR /pub/a.txt\r\n")
            .read(b"550 Permission denied\r\n")
            .build();
        assert!(matches!(
            channel(stream).start_store("/pub/a.txt").await,
            Err(FtpFileStoreStartError::FileUnavailable)
        ));
    }
}
