/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ftpcp contributors
 */

use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tokio::net::{TcpSocket, TcpStream};

use ftpcp_client::{FtpConnectionProvider, FtpServerAddr};

#[derive(Default)]
pub(crate) struct LocalConnectionProvider {
    bind_ip: Option<IpAddr>,
    remote_addr: Option<SocketAddr>,
}

impl LocalConnectionProvider {
    pub(crate) fn set_bind_ip(&mut self, ip: IpAddr) {
        self.bind_ip = Some(ip);
    }

    async fn connect(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        if let Some(ip) = self.bind_ip {
            socket.bind(SocketAddr::new(ip, 0))?;
        }
        socket.connect(addr).await
    }
}

#[async_trait]
impl FtpConnectionProvider<TcpStream> for LocalConnectionProvider {
    async fn new_control_connection(&mut self, server: &FtpServerAddr) -> io::Result<TcpStream> {
        let mut err = io::Error::new(io::ErrorKind::AddrNotAvailable, "no addr resolved");
        for addr in tokio::net::lookup_host(server.to_string()).await? {
            match self.connect(addr).await {
                Ok(stream) => {
                    self.remote_addr = Some(addr);
                    return Ok(stream);
                }
                Err(e) => err = e,
            }
        }

        Err(err)
    }

    async fn new_data_connection(&mut self, server_addr: SocketAddr) -> io::Result<TcpStream> {
        // the advertised IP is often unreachable from behind NAT, dial the
        // control connection's peer with the advertised port instead
        match self.remote_addr {
            Some(addr) => {
                self.connect(SocketAddr::new(addr.ip(), server_addr.port()))
                    .await
            }
            None => Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no resolved upstream addr found",
            )),
        }
    }
}
