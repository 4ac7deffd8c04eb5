//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::{Span, debug, debug_span};

use crate::device::DeviceDescriptor;
use crate::framing::Framing;
use crate::message::{Hello, Request, RpcError};

// NETCONF session debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    SessionConnect(&'a DeviceDescriptor),
    SessionEstablished(&'a DeviceDescriptor, u32, Framing),
    SessionClose(&'a DeviceDescriptor, u32),
    HelloTx(&'a Hello),
    HelloRx(&'a Hello),
    RpcTx(u32, u64, &'a Request, &'a str),
    RpcRx(u32, u64, &'a str),
    RpcWarning(u32, &'a RpcError),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::SessionConnect(device) => {
                device_span(device).in_scope(|| {
                    debug!(
                        protocol = %device.protocol,
                        username = %device.username,
                        "{}", self
                    );
                });
            }
            Debug::SessionEstablished(device, session_id, framing) => {
                device_span(device).in_scope(|| {
                    debug!(%session_id, %framing, "{}", self);
                });
            }
            Debug::SessionClose(device, session_id) => {
                device_span(device).in_scope(|| {
                    debug!(%session_id, "{}", self);
                });
            }
            Debug::HelloTx(hello) => {
                debug_span!("output").in_scope(|| {
                    let data = serde_json::to_string(hello).unwrap_or_default();
                    debug!(%data, "{}", self);
                });
            }
            Debug::HelloRx(hello) => {
                debug_span!("input").in_scope(|| {
                    let data = serde_json::to_string(hello).unwrap_or_default();
                    debug!(%data, "{}", self);
                });
            }
            Debug::RpcTx(session_id, message_id, request, data) => {
                debug_span!("session", id = %session_id).in_scope(|| {
                    debug_span!("output").in_scope(|| {
                        let operation = &request.operation;
                        let path = request.path.as_deref().unwrap_or("-");
                        debug!(
                            %message_id, %operation, %path, %data,
                            "{}", self
                        );
                    });
                });
            }
            Debug::RpcRx(session_id, message_id, data) => {
                debug_span!("session", id = %session_id).in_scope(|| {
                    debug_span!("input").in_scope(|| {
                        debug!(%message_id, %data, "{}", self);
                    });
                });
            }
            Debug::RpcWarning(session_id, error) => {
                debug_span!("session", id = %session_id).in_scope(|| {
                    let data = serde_json::to_string(error).unwrap_or_default();
                    debug!(%data, "{}", self);
                });
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::SessionConnect(..) => {
                write!(f, "connecting to device")
            }
            Debug::SessionEstablished(..) => {
                write!(f, "session established")
            }
            Debug::SessionClose(..) => {
                write!(f, "closing session")
            }
            Debug::HelloTx(..) | Debug::HelloRx(..) => {
                write!(f, "hello")
            }
            Debug::RpcTx(..) => {
                write!(f, "rpc")
            }
            Debug::RpcRx(..) => {
                write!(f, "rpc-reply")
            }
            Debug::RpcWarning(..) => {
                write!(f, "device reported a warning")
            }
        }
    }
}

// ===== helper functions =====

fn device_span(device: &DeviceDescriptor) -> Span {
    debug_span!("device", address = %device.address, port = %device.port)
}
