//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use tracing::{error, warn};

use crate::framing::FramingError;
use crate::message::RpcError;

// NETCONF client errors.
#[derive(Debug)]
pub enum Error {
    Input(InputError),
    Connection(ConnectionError),
    Protocol(ProtocolError),
    Remote(RemoteError),
    Timeout(TimeoutError),
}

// Malformed device descriptor.
#[derive(Debug, Eq, PartialEq)]
pub enum InputError {
    MissingDelimiter(&'static str),
    MissingField(&'static str),
    InvalidAddress(String),
    InvalidPort(String),
}

// Transport, authentication or handshake failure.
#[derive(Debug)]
pub enum ConnectionError {
    UnsupportedProtocol(String),
    Unreachable(std::io::Error),
    Ssh(russh::Error),
    AuthenticationFailed(String),
    Handshake(HandshakeError),
    Io(std::io::Error),
    Closed,
}

// Capability exchange failure.
#[derive(Debug, Eq, PartialEq)]
pub enum HandshakeError {
    MalformedHello(String),
    MissingSessionId,
    IncompatibleVersion,
}

// Local usage errors and replies that can't be understood.
#[derive(Debug, Eq, PartialEq)]
pub enum ProtocolError {
    NotConnected,
    MalformedRequest(String),
    MalformedReply(String),
    MessageIdMismatch { expected: u64, received: Option<String> },
    Framing(FramingError),
}

// Well-formed request rejected by the device.
#[derive(Debug, Eq, PartialEq)]
pub struct RemoteError {
    pub errors: Vec<RpcError>,
}

// No answer within the configured bound.
#[derive(Debug, Eq, PartialEq)]
pub enum TimeoutError {
    Connect(Duration),
    Execute(Duration),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::Input(error) => error.log(),
            Error::Connection(error) => error.log(),
            Error::Protocol(error) => error.log(),
            Error::Remote(error) => error.log(),
            Error::Timeout(error) => error.log(),
        }
    }

    // Whether the session can no longer be trusted after this error.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Connection(_)
                | Error::Timeout(_)
                | Error::Protocol(
                    ProtocolError::Framing(_)
                        | ProtocolError::MessageIdMismatch { .. }
                )
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Input(error) => error.fmt(f),
            Error::Connection(error) => error.fmt(f),
            Error::Protocol(error) => error.fmt(f),
            Error::Remote(error) => error.fmt(f),
            Error::Timeout(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Input(error) => Some(error),
            Error::Connection(error) => Some(error),
            Error::Protocol(error) => Some(error),
            Error::Remote(error) => Some(error),
            Error::Timeout(error) => Some(error),
        }
    }
}

impl From<InputError> for Error {
    fn from(error: InputError) -> Error {
        Error::Input(error)
    }
}

impl From<ConnectionError> for Error {
    fn from(error: ConnectionError) -> Error {
        Error::Connection(error)
    }
}

impl From<HandshakeError> for Error {
    fn from(error: HandshakeError) -> Error {
        Error::Connection(ConnectionError::Handshake(error))
    }
}

impl From<ProtocolError> for Error {
    fn from(error: ProtocolError) -> Error {
        Error::Protocol(error)
    }
}

impl From<RemoteError> for Error {
    fn from(error: RemoteError) -> Error {
        Error::Remote(error)
    }
}

impl From<TimeoutError> for Error {
    fn from(error: TimeoutError) -> Error {
        Error::Timeout(error)
    }
}

// ===== impl InputError =====

impl InputError {
    pub fn log(&self) {
        error!("{}", self);
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::MissingDelimiter(delimiter) => {
                write!(f, "invalid device URI: missing '{}'", delimiter)
            }
            InputError::MissingField(field) => {
                write!(f, "invalid device URI: missing {}", field)
            }
            InputError::InvalidAddress(address) => {
                write!(f, "invalid device URI: invalid address '{}'", address)
            }
            InputError::InvalidPort(port) => {
                write!(f, "invalid device URI: invalid port '{}'", port)
            }
        }
    }
}

impl std::error::Error for InputError {}

// ===== impl ConnectionError =====

impl ConnectionError {
    pub fn log(&self) {
        match self {
            ConnectionError::Unreachable(error)
            | ConnectionError::Io(error) => {
                warn!(%error, "{}", self);
            }
            ConnectionError::Ssh(error) => {
                warn!(%error, "{}", self);
            }
            ConnectionError::Handshake(error) => {
                warn!(%error, "{}", self);
            }
            ConnectionError::UnsupportedProtocol(protocol) => {
                warn!(%protocol, "{}", self);
            }
            ConnectionError::AuthenticationFailed(username) => {
                warn!(%username, "{}", self);
            }
            ConnectionError::Closed => {
                warn!("{}", self);
            }
        }
    }
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::UnsupportedProtocol(protocol) => {
                write!(f, "unsupported protocol '{}'", protocol)
            }
            ConnectionError::Unreachable(..) => {
                write!(f, "device unreachable")
            }
            ConnectionError::Ssh(..) => {
                write!(f, "SSH transport error")
            }
            ConnectionError::AuthenticationFailed(..) => {
                write!(f, "authentication failed")
            }
            ConnectionError::Handshake(..) => {
                write!(f, "NETCONF capability exchange failed")
            }
            ConnectionError::Io(..) => {
                write!(f, "I/O error")
            }
            ConnectionError::Closed => {
                write!(f, "connection closed by peer")
            }
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::Unreachable(error)
            | ConnectionError::Io(error) => Some(error),
            ConnectionError::Ssh(error) => Some(error),
            ConnectionError::Handshake(error) => Some(error),
            _ => None,
        }
    }
}

// ===== impl HandshakeError =====

impl std::fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakeError::MalformedHello(reason) => {
                write!(f, "malformed hello message: {}", reason)
            }
            HandshakeError::MissingSessionId => {
                write!(f, "hello message without session-id")
            }
            HandshakeError::IncompatibleVersion => {
                write!(f, "no common NETCONF base version")
            }
        }
    }
}

impl std::error::Error for HandshakeError {}

// ===== impl ProtocolError =====

impl ProtocolError {
    pub fn log(&self) {
        match self {
            ProtocolError::MessageIdMismatch { expected, received } => {
                warn!(%expected, ?received, "{}", self);
            }
            _ => {
                warn!("{}", self);
            }
        }
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::NotConnected => {
                write!(f, "session not connected")
            }
            ProtocolError::MalformedRequest(reason) => {
                write!(f, "malformed request: {}", reason)
            }
            ProtocolError::MalformedReply(reason) => {
                write!(f, "malformed reply: {}", reason)
            }
            ProtocolError::MessageIdMismatch { .. } => {
                write!(f, "reply message-id doesn't match the request")
            }
            ProtocolError::Framing(error) => {
                write!(f, "framing error: {}", error)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

// ===== impl RemoteError =====

impl RemoteError {
    pub fn log(&self) {
        for error in &self.errors {
            warn!(
                error_type = ?error.error_type,
                tag = ?error.tag,
                severity = %error.severity,
                path = ?error.path,
                message = ?error.message,
                "{}", self
            );
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request rejected by the device")?;
        if let Some(error) = self.errors.first() {
            match (&error.tag, &error.message) {
                (Some(tag), Some(message)) => {
                    write!(f, ": {} ({})", tag, message)?
                }
                (Some(tag), None) => write!(f, ": {}", tag)?,
                (None, Some(message)) => write!(f, ": {}", message)?,
                (None, None) => (),
            }
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {}

// ===== impl TimeoutError =====

impl TimeoutError {
    pub fn log(&self) {
        match self {
            TimeoutError::Connect(timeout) | TimeoutError::Execute(timeout) => {
                warn!(?timeout, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutError::Connect(..) => {
                write!(f, "timed out while connecting")
            }
            TimeoutError::Execute(..) => {
                write!(f, "timed out waiting for the reply")
            }
        }
    }
}

impl std::error::Error for TimeoutError {}
