//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use russh::client;
use russh::keys::PublicKey;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tracing::debug;

use crate::device::DeviceDescriptor;
use crate::error::ConnectionError;
use crate::transport::{BoxStream, Connector};

// SSH subsystem name (RFC 6242, section 3).
const NETCONF_SUBSYSTEM: &str = "netconf";

// NETCONF over SSH with password authentication.
#[derive(Debug, Default)]
pub struct SshConnector;

struct ClientHandler {
    address: String,
}

// Channel stream that keeps its SSH session alive.
struct SshStream {
    _session: Box<client::Handle<ClientHandler>>,
    channel: Pin<Box<russh::ChannelStream<client::Msg>>>,
}

// ===== impl SshConnector =====

#[async_trait]
impl Connector for SshConnector {
    async fn connect(
        &self,
        device: &DeviceDescriptor,
    ) -> Result<BoxStream, ConnectionError> {
        let config = Arc::new(client::Config::default());
        let handler = ClientHandler {
            address: device.address.clone(),
        };
        let mut session = client::connect(
            config,
            (device.address.as_str(), device.port),
            handler,
        )
        .await
        .map_err(|error| match error {
            russh::Error::IO(error) => ConnectionError::Unreachable(error),
            error => ConnectionError::Ssh(error),
        })?;

        let auth = session
            .authenticate_password(
                device.username.clone(),
                device.password.clone(),
            )
            .await
            .map_err(ConnectionError::Ssh)?;
        if !auth.success() {
            return Err(ConnectionError::AuthenticationFailed(
                device.username.clone(),
            ));
        }

        let channel = session
            .channel_open_session()
            .await
            .map_err(ConnectionError::Ssh)?;
        channel
            .request_subsystem(true, NETCONF_SUBSYSTEM)
            .await
            .map_err(ConnectionError::Ssh)?;

        Ok(Box::pin(SshStream {
            _session: Box::new(session),
            channel: Box::pin(channel.into_stream()),
        }))
    }
}

// ===== impl ClientHandler =====

impl client::Handler for ClientHandler {
    type Error = russh::Error;

    // Host keys aren't pinned. The fingerprint is logged so it can be
    // verified out of band.
    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        let fingerprint = server_public_key.fingerprint(Default::default());
        debug!(address = %self.address, %fingerprint, "accepting host key");
        Ok(true)
    }
}

// ===== impl SshStream =====

impl AsyncRead for SshStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.channel.as_mut().poll_read(cx, buf)
    }
}

impl AsyncWrite for SshStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.channel.as_mut().poll_write(cx, buf)
    }

    fn poll_flush(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<io::Result<()>> {
        self.channel.as_mut().poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<io::Result<()>> {
        self.channel.as_mut().poll_shutdown(cx)
    }
}
