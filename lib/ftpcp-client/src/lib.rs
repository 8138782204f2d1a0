/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

//! Async client for passive-mode FTP.
//!
//! One [`FtpClient`] drives one control session. Data transfers follow a
//! strict two-phase sequence: the passive data connection is negotiated and
//! connected first, only then is the triggering command (LIST/RETR/STOR)
//! written, and a transfer counts as complete only once the server confirms
//! it on the control channel — data-socket EOF alone proves nothing.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

mod debug;
pub use debug::{FTP_DEBUG_LOG_LEVEL, FTP_DEBUG_LOG_TARGET};

mod addr;
pub use addr::{FtpServerAddr, FtpServerAddrParseError};

mod config;
pub use config::{FtpClientConfig, FtpControlConfig, FtpTransferConfig};

mod connection;
pub use connection::FtpConnectionProvider;

mod error;
pub use error::{
    FtpCommandError, FtpConnectError, FtpFileListError, FtpFileRetrieveError,
    FtpFileRetrieveStartError, FtpFileStatError, FtpFileStoreError, FtpFileStoreStartError,
    FtpLineDataReadError, FtpRawResponseError, FtpSessionOpenError, FtpTransferServerError,
    FtpTransferSetupError,
};
use error::FtpAuthStatus;

mod io;

mod control;
use control::FtpControlChannel;

mod transfer;
pub use transfer::{FtpLineDataReceiver, FtpTransferType};
use transfer::FtpLineDataTransfer;

pub struct FtpClient<CP, S>
where
    CP: FtpConnectionProvider<S>,
    S: AsyncRead + AsyncWrite + Unpin,
{
    config: Arc<FtpClientConfig>,
    conn_provider: CP,
    control: FtpControlChannel<S>,
    transfer_type: Option<FtpTransferType>,
}

impl<CP, S> FtpClient<CP, S>
where
    CP: FtpConnectionProvider<S>,
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Open the control connection and consume the server greeting. On
    /// failure the connection provider is handed back to the caller.
    pub async fn connect_to(
        server: FtpServerAddr,
        mut conn_provider: CP,
        config: &Arc<FtpClientConfig>,
    ) -> Result<Self, (FtpConnectError, CP)> {
        let stream = match tokio::time::timeout(
            config.connect_timeout,
            conn_provider.new_control_connection(&server),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err((FtpConnectError::ConnectIoError(e), conn_provider)),
            Err(_) => return Err((FtpConnectError::ConnectTimedOut, conn_provider)),
        };

        let mut control = FtpControlChannel::new(stream, config.control.clone());
        match tokio::time::timeout(config.greeting_timeout, control.wait_greetings()).await {
            Ok(Ok(_)) => {}
            Ok(Err(FtpCommandError::ServiceNotAvailable)) => {
                return Err((FtpConnectError::ServiceNotAvailable, conn_provider));
            }
            Ok(Err(e)) => return Err((FtpConnectError::GreetingFailed(e), conn_provider)),
            Err(_) => return Err((FtpConnectError::GreetingTimedOut, conn_provider)),
        }

        Ok(FtpClient {
            config: Arc::clone(config),
            conn_provider,
            control,
            transfer_type: None,
        })
    }

    #[inline]
    pub fn connection_provider(&self) -> &CP {
        &self.conn_provider
    }

    pub async fn new_user_session(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), FtpSessionOpenError> {
        match self.control.send_username(username).await? {
            FtpAuthStatus::LoggedIn => Ok(()),
            FtpAuthStatus::NotLoggedIn => Err(FtpSessionOpenError::NotLoggedIn),
            FtpAuthStatus::NeedAccount => Err(FtpSessionOpenError::AccountIsNeeded),
            FtpAuthStatus::NeedPassword => match self.control.send_password(password).await? {
                FtpAuthStatus::LoggedIn => Ok(()),
                FtpAuthStatus::NeedAccount => Err(FtpSessionOpenError::AccountIsNeeded),
                _ => Err(FtpSessionOpenError::NotLoggedIn),
            },
        }
    }

    async fn set_transfer_type(&mut self, t: FtpTransferType) -> Result<(), FtpCommandError> {
        if self.transfer_type != Some(t) {
            self.control.request_transfer_type(t).await?;
            self.transfer_type = Some(t);
        }
        Ok(())
    }

    /// Negotiate PASV and connect the data socket. This must complete before
    /// the triggering command is written, as the server may use the data
    /// connection immediately after accepting that command.
    async fn setup_data_connection(&mut self) -> Result<S, FtpTransferSetupError> {
        let server_addr = self.control.request_pasv_port().await?;
        match tokio::time::timeout(
            self.config.connect_timeout,
            self.conn_provider.new_data_connection(server_addr),
        )
        .await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(FtpTransferSetupError::DataConnectFailed(e)),
            Err(_) => Err(FtpTransferSetupError::DataConnectTimedOut),
        }
    }

    /// Start a LIST transfer and return the connected data stream. The
    /// stream is dropped (closing the data connection) if the server
    /// rejects the command.
    pub async fn list_directory_start(
        &mut self,
        path: &str,
    ) -> Result<S, FtpFileRetrieveStartError> {
        let data_stream = self.setup_data_connection().await?;
        self.control.start_list(path).await?;
        Ok(data_stream)
    }

    /// Drain the listing from `data_stream` into `receiver`, then wait for
    /// the end reply. Success is decided by that reply alone.
    pub async fn list_directory_receive<R>(
        &mut self,
        data_stream: S,
        receiver: &mut R,
    ) -> Result<(), FtpFileListError>
    where
        R: FtpLineDataReceiver + Send,
    {
        let line_transfer = FtpLineDataTransfer::new(data_stream, &self.config.transfer);
        match tokio::time::timeout(
            self.config.transfer.list_all_timeout,
            line_transfer.read_to_end(receiver),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(FtpFileListError::TimeoutToWaitAllData),
        }

        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_list(),
        )
        .await
        {
            Ok(r) => r.map_err(FtpFileListError::ServerReportedError),
            Err(_) => Err(FtpFileListError::TimeoutToWaitEndReply),
        }
    }

    /// Start a RETR transfer and return the connected data stream. The
    /// caller streams the file bytes out of it until EOF, then must call
    /// [`FtpClient::wait_retrieve_end_reply`] — only a confirming end reply
    /// makes the download complete.
    pub async fn retrieve_file_start(
        &mut self,
        path: &str,
    ) -> Result<S, FtpFileRetrieveStartError> {
        self.set_transfer_type(FtpTransferType::Image).await?;
        let data_stream = self.setup_data_connection().await?;
        self.control.start_retrieve(path).await?;
        Ok(data_stream)
    }

    pub async fn wait_retrieve_end_reply(&mut self) -> Result<(), FtpFileRetrieveError> {
        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_retrieve(),
        )
        .await
        {
            Ok(r) => r.map_err(FtpFileRetrieveError::from),
            Err(_) => Err(FtpFileRetrieveError::TimeoutToWaitEndReply),
        }
    }

    /// Start a STOR transfer and return the connected data stream. The
    /// caller writes the file bytes into it, drops it to signal EOF, then
    /// must call [`FtpClient::wait_store_end_reply`].
    pub async fn store_file_start(&mut self, path: &str) -> Result<S, FtpFileStoreStartError> {
        self.set_transfer_type(FtpTransferType::Image).await?;
        let data_stream = self.setup_data_connection().await?;
        self.control.start_store(path).await?;
        Ok(data_stream)
    }

    pub async fn wait_store_end_reply(&mut self) -> Result<(), FtpFileStoreError> {
        match tokio::time::timeout(
            self.config.transfer.end_wait_timeout,
            self.control.wait_store(),
        )
        .await
        {
            Ok(r) => r.map_err(FtpFileStoreError::from),
            Err(_) => Err(FtpFileStoreError::TimeoutToWaitEndReply),
        }
    }

    /// Wait until the control connection has data to read. Used while
    /// streaming a store to catch a premature server end reply.
    pub async fn wait_control_read_ready(&mut self) -> Result<(), FtpRawResponseError> {
        self.control.wait_read_ready().await
    }

    pub async fn make_dir(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        self.control.make_dir(path).await
    }

    pub async fn remove_dir(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        self.control.remove_dir(path).await
    }

    pub async fn delete_file(&mut self, path: &str) -> Result<(), FtpFileStatError> {
        self.control.delete_file(path).await
    }

    /// Send QUIT and drop the control connection. Data connections are
    /// per-transfer and already closed by the time this is called.
    pub async fn quit_and_close(mut self) -> Result<(), FtpCommandError> {
        self.control.send_quit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::net::SocketAddr;

    use async_trait::async_trait;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio_test::io::{Builder, Mock};

    struct MockProvider {
        control: Option<Mock>,
        data: Option<Mock>,
        data_requested_for: Option<SocketAddr>,
    }

    impl MockProvider {
        fn new(control: Mock) -> Self {
            MockProvider {
                control: Some(control),
                data: None,
                data_requested_for: None,
            }
        }

        fn with_data(control: Mock, data: Mock) -> Self {
            MockProvider {
                control: Some(control),
                data: Some(data),
                data_requested_for: None,
            }
        }
    }

    #[async_trait]
    impl FtpConnectionProvider<Mock> for MockProvider {
        async fn new_control_connection(&mut self, _server: &FtpServerAddr) -> io::Result<Mock> {
            Ok(self.control.take().unwrap())
        }

        async fn new_data_connection(&mut self, server_addr: SocketAddr) -> io::Result<Mock> {
            self.data_requested_for = Some(server_addr);
            self.data
                .take()
                .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionRefused, "no data stream"))
        }
    }

    async fn connected_client(provider: MockProvider) -> FtpClient<MockProvider, Mock> {
        let config = Arc::new(FtpClientConfig::default());
        let server = FtpServerAddr::new("ftp.example.net".to_string(), 21);
        FtpClient::connect_to(server, provider, &config)
            .await
            .map_err(|(e, _)| e)
            .unwrap()
    }

    #[derive(Default)]
    struct CollectReceiver {
        lines: Vec<String>,
    }

    #[async_trait]
    impl FtpLineDataReceiver for CollectReceiver {
        async fn recv_line(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }

        fn should_return_early(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn login_with_password() {
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"USER anon\r\n")
            .read(b"331 Password required\r\n")
            .write(b"PASS \r\n")
            .read(b"230 Logged in\r\n")
            .build();
        let mut client = connected_client(MockProvider::new(control)).await;
        client
            .new_user_session(Some("anon"), Some(""))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn login_rejected() {
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"USER root\r\n")
            .read(b"331 Password required\r\n")
            .write(b"PASS hunter2\r\n")
            .read(b"530 Login incorrect\r\n")
            .build();
        let mut client = connected_client(MockProvider::new(control)).await;
        assert!(matches!(
            client.new_user_session(Some("root"), Some("hunter2")).await,
            Err(FtpSessionOpenError::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn list_full_session() {
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"USER anon\r\n")
            .read(b"331 need password\r\n")
            .write(b"PASS \r\n")
            .read(b"230 ok\r\n")
            .write(b"PASV\r\n")
            .read(b"227 Entering Passive Mode (10,0,0,1,4,1)\r\n")
            .write(b"LIST /pub\r\n")
            .read(b"150 Opening data connection\r\n")
            .read(b"226 Transfer complete\r\n")
            .build();
        let data = Builder::new()
            .read(b"-rw-r--r-- 1 ftp ftp 12 Jan 1 00:00 a.txt\r\n")
            .build();

        let mut client = connected_client(MockProvider::with_data(control, data)).await;
        client.new_user_session(Some("anon"), None).await.unwrap();

        let data_stream = client.list_directory_start("/pub").await.unwrap();
        assert_eq!(
            client.connection_provider().data_requested_for.unwrap(),
            "10.0.0.1:1025".parse().unwrap()
        );

        let mut receiver = CollectReceiver::default();
        client
            .list_directory_receive(data_stream, &mut receiver)
            .await
            .unwrap();
        assert_eq!(receiver.lines.len(), 1);
        assert!(receiver.lines[0].contains("a.txt"));
    }

    #[tokio::test]
    async fn pasv_rejected_opens_no_data_connection() {
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"TYPE I\r\n")
            .read(b"200 ok\r\n")
            .write(b"PASV\r\n")
            .read(b"227 but no address\r\n")
            .build();
        let mut client = connected_client(MockProvider::new(control)).await;
        let err = client.retrieve_file_start("/pub/a.txt").await.unwrap_err();
        assert!(matches!(
            err,
            FtpFileRetrieveStartError::TransferSetupFailed(FtpTransferSetupError::CommandError(
                FtpCommandError::InvalidReplySyntax(_, 227)
            ))
        ));
        assert!(client.connection_provider().data_requested_for.is_none());
    }

    #[tokio::test]
    async fn retrieve_streams_then_confirms() {
        let payload: Vec<u8> = (0..80000u32).map(|i| (i % 251) as u8).collect();
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"TYPE I\r\n")
            .read(b"200 ok\r\n")
            .write(b"PASV\r\n")
            .read(b"227 ok (127,0,0,1,4,210)\r\n")
            .write(b"RETR /pub/blob\r\n")
            .read(b"150 sending\r\n")
            .read(b"226 done\r\n")
            .build();
        let mut data_builder = Builder::new();
        for chunk in payload.chunks(4096) {
            data_builder.read(chunk);
        }
        let data = data_builder.build();

        let mut client = connected_client(MockProvider::with_data(control, data)).await;
        let mut data_stream = client.retrieve_file_start("/pub/blob").await.unwrap();

        let mut sink = Vec::new();
        data_stream.read_to_end(&mut sink).await.unwrap();
        drop(data_stream);
        client.wait_retrieve_end_reply().await.unwrap();

        assert_eq!(sink, payload);
    }

    #[tokio::test]
    async fn retrieve_end_reply_failure_wins_over_data_eof() {
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"TYPE I\r\n")
            .read(b"200 ok\r\n")
            .write(b"PASV\r\n")
            .read(b"227 ok (127,0,0,1,4,210)\r\n")
            .write(b"RETR /pub/a\r\n")
            .read(b"150 sending\r\n")
            .read(b"426 Transfer aborted\r\n")
            .build();
        let data = Builder::new().read(b"partial").build();

        let mut client = connected_client(MockProvider::with_data(control, data)).await;
        let mut data_stream = client.retrieve_file_start("/pub/a").await.unwrap();
        let mut sink = Vec::new();
        data_stream.read_to_end(&mut sink).await.unwrap();
        drop(data_stream);

        assert!(matches!(
            client.wait_retrieve_end_reply().await,
            Err(FtpFileRetrieveError::ServerReportedError(
                FtpTransferServerError::DataTransferLost
            ))
        ));
    }

    #[tokio::test]
    async fn store_zero_and_one_byte() {
        for payload in [&b""[..], &b"x"[..]] {
            let control = Builder::new()
                .read(b"220 ready\r\n")
                .write(b"TYPE I\r\n")
                .read(b"200 ok\r\n")
                .write(b"PASV\r\n")
                .read(b"227 ok (127,0,0,1,0,90)\r\n")
                .write(b"STOR /pub/tiny\r\n")
                .read(b"150 go ahead\r\n")
                .read(b"226 stored\r\n")
                .build();
            let mut data_builder = Builder::new();
            if !payload.is_empty() {
                data_builder.write(payload);
            }
            let data = data_builder.build();

            let mut client = connected_client(MockProvider::with_data(control, data)).await;
            let mut data_stream = client.store_file_start("/pub/tiny").await.unwrap();
            data_stream.write_all(payload).await.unwrap();
            data_stream.flush().await.unwrap();
            drop(data_stream);
            client.wait_store_end_reply().await.unwrap();
        }
    }

    #[tokio::test]
    async fn transfer_type_sent_once_per_session() {
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"TYPE I\r\n")
            .read(b"200 ok\r\n")
            .write(b"PASV\r\n")
            .read(b"227 ok (127,0,0,1,4,1)\r\n")
            .write(b"RETR /a\r\n")
            .read(b"150 ok\r\n")
            .read(b"226 ok\r\n")
            // second transfer in the same session: no TYPE exchange
            .write(b"PASV\r\n")
            .read(b"550 no pasv for you\r\n")
            .build();
        let data = Builder::new().build();

        let mut client = connected_client(MockProvider::with_data(control, data)).await;
        let mut data_stream = client.retrieve_file_start("/a").await.unwrap();
        let mut sink = Vec::new();
        data_stream.read_to_end(&mut sink).await.unwrap();
        drop(data_stream);
        client.wait_retrieve_end_reply().await.unwrap();

        assert!(client.retrieve_file_start("/b").await.is_err());
    }

    #[tokio::test]
    async fn quit_session() {
        let control = Builder::new()
            .read(b"220 ready\r\n")
            .write(b"QUIT\r\n")
            .read(b"221 bye\r\n")
            .build();
        let client = connected_client(MockProvider::new(control)).await;
        client.quit_and_close().await.unwrap();
    }
}
