//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::debug::Debug;
use crate::device::DeviceDescriptor;
use crate::error::{
    ConnectionError, Error, HandshakeError, ProtocolError, TimeoutError,
};
use crate::framing::{FrameDecoder, Framing};
use crate::message::{
    CAPABILITY_BASE_1_1, Capabilities, Hello, Request, RpcReply,
};
use crate::transport::{self, BoxStream, Connector};

// Session trace options.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TraceOptions {
    // Connection lifecycle.
    pub session: bool,
    // Every message sent or received.
    pub messages: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProviderConfig {
    pub connect_timeout: Duration,
    pub execute_timeout: Duration,
    pub trace_opts: TraceOptions,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum State {
    Disconnected,
    Connected,
}

// Executes protocol-level requests on a device.
pub trait ServiceProvider {
    fn execute(&mut self, request: Request) -> Result<RpcReply, Error>;

    fn is_connected(&self) -> bool;
}

// Synchronous NETCONF client owning one session to one device.
//
// The order of the fields in this struct is important. The connection must
// be dropped before the runtime that drives it. Rust drops struct fields in
// declaration order.
#[derive(Debug)]
pub struct NetconfServiceProvider {
    device: DeviceDescriptor,
    config: ProviderConfig,
    // Unset when the descriptor's protocol isn't supported.
    connector: Option<Box<dyn Connector>>,
    conn: Option<Connection>,
    runtime: tokio::runtime::Runtime,
}

// Established session.
struct Connection {
    stream: BoxStream,
    decoder: FrameDecoder,
    framing: Framing,
    session_id: u32,
    server_caps: Capabilities,
    last_message_id: u64,
}

// ===== impl ProviderConfig =====

impl Default for ProviderConfig {
    fn default() -> ProviderConfig {
        ProviderConfig {
            connect_timeout: Duration::from_secs(30),
            execute_timeout: Duration::from_secs(60),
            trace_opts: TraceOptions::default(),
        }
    }
}

// ===== impl NetconfServiceProvider =====

impl NetconfServiceProvider {
    // Creates a disconnected provider using the transport that matches the
    // descriptor's protocol.
    pub fn new(
        device: DeviceDescriptor,
        config: ProviderConfig,
    ) -> Result<NetconfServiceProvider, Error> {
        let connector = transport::connector(&device).ok();
        NetconfServiceProvider::build(device, config, connector)
    }

    // Creates a disconnected provider using a custom transport.
    pub fn with_connector(
        device: DeviceDescriptor,
        config: ProviderConfig,
        connector: Box<dyn Connector>,
    ) -> Result<NetconfServiceProvider, Error> {
        NetconfServiceProvider::build(device, config, Some(connector))
    }

    fn build(
        device: DeviceDescriptor,
        config: ProviderConfig,
        connector: Option<Box<dyn Connector>>,
    ) -> Result<NetconfServiceProvider, Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ConnectionError::Io)?;

        Ok(NetconfServiceProvider {
            device,
            config,
            connector,
            conn: None,
            runtime,
        })
    }

    // Opens the transport and exchanges hello messages. Does nothing if the
    // session is already established.
    pub fn connect(&mut self) -> Result<(), Error> {
        if self.conn.is_some() {
            return Ok(());
        }

        let Some(connector) = self.connector.as_deref() else {
            let protocol = self.device.protocol.clone();
            return Err(ConnectionError::UnsupportedProtocol(protocol).into());
        };
        let device = &self.device;
        let timeout = self.config.connect_timeout;
        let trace_opts = &self.config.trace_opts;

        if trace_opts.session {
            Debug::SessionConnect(device).log();
        }
        let conn = self
            .runtime
            .block_on(async {
                tokio::time::timeout(
                    timeout,
                    Connection::open(connector, device, trace_opts),
                )
                .await
            })
            .map_err(|_| TimeoutError::Connect(timeout))??;
        if trace_opts.session {
            Debug::SessionEstablished(device, conn.session_id, conn.framing)
                .log();
        }

        self.conn = Some(conn);
        Ok(())
    }

    // Sends one request and waits for its reply.
    pub fn execute(&mut self, request: Request) -> Result<RpcReply, Error> {
        let Some(conn) = self.conn.as_mut() else {
            return Err(ProtocolError::NotConnected.into());
        };
        request.validate()?;

        let timeout = self.config.execute_timeout;
        let trace_opts = &self.config.trace_opts;
        let result = self.runtime.block_on(async {
            tokio::time::timeout(timeout, conn.rpc(&request, trace_opts)).await
        });
        let result = match result {
            Ok(result) => result,
            Err(_) => Err(TimeoutError::Execute(timeout).into()),
        };

        match result {
            Ok(reply) => {
                if trace_opts.messages {
                    for warning in reply.warnings() {
                        Debug::RpcWarning(conn.session_id, warning).log();
                    }
                }
                Ok(reply.into_result()?)
            }
            Err(error) => {
                // The framing state is unknown after a transport failure or
                // an abandoned reply.
                if error.is_fatal() {
                    self.conn = None;
                }
                Err(error)
            }
        }
    }

    // Closes the session. Calling this on a disconnected provider is a
    // no-op.
    //
    // The provider is disconnected when this returns, even if the device
    // didn't acknowledge the close.
    pub fn disconnect(&mut self) -> Result<(), Error> {
        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };

        let timeout = self.config.execute_timeout;
        let trace_opts = &self.config.trace_opts;
        if trace_opts.session {
            Debug::SessionClose(&self.device, conn.session_id).log();
        }
        let result = self.runtime.block_on(async {
            let result = tokio::time::timeout(timeout, conn.close(trace_opts))
                .await
                .unwrap_or_else(|_| Err(TimeoutError::Execute(timeout).into()));
            let _ = conn.stream.shutdown().await;
            result
        });

        match result {
            Err(Error::Remote(error)) => {
                // The session is gone either way.
                error.log();
                Ok(())
            }
            result => result,
        }
    }

    pub fn device(&self) -> &DeviceDescriptor {
        &self.device
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        match self.conn {
            Some(_) => State::Connected,
            None => State::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn session_id(&self) -> Option<u32> {
        self.conn.as_ref().map(|conn| conn.session_id)
    }

    pub fn framing(&self) -> Option<Framing> {
        self.conn.as_ref().map(|conn| conn.framing)
    }

    pub fn server_capabilities(&self) -> Option<&Capabilities> {
        self.conn.as_ref().map(|conn| &conn.server_caps)
    }
}

impl ServiceProvider for NetconfServiceProvider {
    fn execute(&mut self, request: Request) -> Result<RpcReply, Error> {
        NetconfServiceProvider::execute(self, request)
    }

    fn is_connected(&self) -> bool {
        NetconfServiceProvider::is_connected(self)
    }
}

impl Drop for NetconfServiceProvider {
    fn drop(&mut self) {
        if let Err(error) = self.disconnect() {
            error.log();
        }
    }
}

// ===== impl Connection =====

impl Connection {
    async fn open(
        connector: &dyn Connector,
        device: &DeviceDescriptor,
        trace_opts: &TraceOptions,
    ) -> Result<Connection, Error> {
        let mut stream = connector.connect(device).await?;

        // Hello messages always use end-of-message framing.
        let mut decoder = FrameDecoder::new(Framing::EndOfMessage);
        let hello = Hello::client();
        if trace_opts.messages {
            Debug::HelloTx(&hello).log();
        }
        let msg = Framing::EndOfMessage.encode(hello.encode()?.as_bytes());
        write_message(&mut stream, &msg).await?;

        let data = read_message(&mut stream, &mut decoder).await?;
        let data = std::str::from_utf8(&data).map_err(|_| {
            HandshakeError::MalformedHello("invalid UTF-8".to_owned())
        })?;
        let server_hello = Hello::decode(data.trim())?;
        if trace_opts.messages {
            Debug::HelloRx(&server_hello).log();
        }
        let session_id = server_hello
            .session_id
            .ok_or(HandshakeError::MissingSessionId)?;
        if !server_hello.capabilities.supports_base() {
            return Err(HandshakeError::IncompatibleVersion.into());
        }

        let framing = if hello.capabilities.contains(CAPABILITY_BASE_1_1)
            && server_hello.capabilities.contains(CAPABILITY_BASE_1_1)
        {
            Framing::Chunked
        } else {
            Framing::EndOfMessage
        };
        decoder.set_framing(framing);

        Ok(Connection {
            stream,
            decoder,
            framing,
            session_id,
            server_caps: server_hello.capabilities,
            last_message_id: 0,
        })
    }

    async fn rpc(
        &mut self,
        request: &Request,
        trace_opts: &TraceOptions,
    ) -> Result<RpcReply, Error> {
        self.last_message_id += 1;
        let message_id = self.last_message_id;

        let rpc = request.encode(message_id)?;
        if trace_opts.messages {
            Debug::RpcTx(self.session_id, message_id, request, &rpc).log();
        }
        let msg = self.framing.encode(rpc.as_bytes());
        write_message(&mut self.stream, &msg).await?;

        let data = read_message(&mut self.stream, &mut self.decoder).await?;
        let data = std::str::from_utf8(&data).map_err(|_| {
            ProtocolError::MalformedReply("invalid UTF-8".to_owned())
        })?;
        if trace_opts.messages {
            Debug::RpcRx(self.session_id, message_id, data).log();
        }
        let reply = RpcReply::decode(data.trim())?;

        // A device may omit the message-id only when it couldn't parse the
        // request at all, in which case the reply carries an rpc-error.
        let expected = message_id.to_string();
        match &reply.message_id {
            Some(received) if *received == expected => (),
            None if reply.has_errors() => (),
            received => {
                return Err(ProtocolError::MessageIdMismatch {
                    expected: message_id,
                    received: received.clone(),
                }
                .into());
            }
        }

        Ok(reply)
    }

    async fn close(&mut self, trace_opts: &TraceOptions) -> Result<(), Error> {
        let reply = self.rpc(&Request::close_session(), trace_opts).await?;
        reply.into_result()?;
        Ok(())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("framing", &self.framing)
            .field("server_caps", &self.server_caps)
            .field("last_message_id", &self.last_message_id)
            .finish()
    }
}

// ===== helper functions =====

async fn write_message(
    stream: &mut BoxStream,
    msg: &[u8],
) -> Result<(), Error> {
    stream.write_all(msg).await.map_err(ConnectionError::Io)?;
    stream.flush().await.map_err(ConnectionError::Io)?;
    Ok(())
}

async fn read_message(
    stream: &mut BoxStream,
    decoder: &mut FrameDecoder,
) -> Result<Bytes, Error> {
    loop {
        if let Some(msg) = decoder.decode().map_err(ProtocolError::Framing)? {
            return Ok(msg);
        }
        let buf = decoder.buffer_mut();
        buf.reserve(4096);
        let nbytes = stream.read_buf(buf).await.map_err(ConnectionError::Io)?;
        if nbytes == 0 {
            return Err(ConnectionError::Closed.into());
        }
    }
}
