//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::device::DeviceDescriptor;
use crate::error::ConnectionError;
use crate::ssh::SshConnector;

// Byte stream carrying one NETCONF session.
pub trait AsyncStream: AsyncRead + AsyncWrite + Send {}

pub type BoxStream = Pin<Box<dyn AsyncStream>>;

// Opens the byte stream a NETCONF session runs over.
#[async_trait]
pub trait Connector: std::fmt::Debug + Send + Sync {
    async fn connect(
        &self,
        device: &DeviceDescriptor,
    ) -> Result<BoxStream, ConnectionError>;
}

// Plain NETCONF over TCP, without any transport security.
#[derive(Debug, Default)]
pub struct TcpConnector;

// ===== impl AsyncStream =====

impl<T> AsyncStream for T where T: AsyncRead + AsyncWrite + Send {}

// ===== impl TcpConnector =====

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(
        &self,
        device: &DeviceDescriptor,
    ) -> Result<BoxStream, ConnectionError> {
        let stream = TcpStream::connect((device.address.as_str(), device.port))
            .await
            .map_err(ConnectionError::Unreachable)?;
        stream.set_nodelay(true).map_err(ConnectionError::Io)?;
        Ok(Box::pin(stream))
    }
}

// ===== global functions =====

// Returns the connector for the descriptor's protocol.
pub fn connector(
    device: &DeviceDescriptor,
) -> Result<Box<dyn Connector>, ConnectionError> {
    match device.protocol.as_str() {
        "ssh" => Ok(Box::new(SshConnector)),
        "tcp" => Ok(Box::new(TcpConnector)),
        protocol => {
            Err(ConnectionError::UnsupportedProtocol(protocol.to_owned()))
        }
    }
}
