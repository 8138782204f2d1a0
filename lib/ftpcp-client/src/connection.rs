/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::FtpServerAddr;

#[async_trait]
pub trait FtpConnectionProvider<T: AsyncRead + AsyncWrite> {
    async fn new_control_connection(&mut self, server: &FtpServerAddr) -> io::Result<T>;

    /// Open the data connection for one transfer. `server_addr` is the
    /// address advertised by the server in its 227 reply; implementations
    /// may substitute the control connection's peer IP when the advertised
    /// one is not reachable from here.
    async fn new_data_connection(&mut self, server_addr: SocketAddr) -> io::Result<T>;
}
