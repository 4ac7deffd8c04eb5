//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::{debug, debug_span};
use yangkit_entity::SchemaPath;
use yangkit_netconf::message::EditOperation;

// CRUD service debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    RequestTx(EditOperation, &'a SchemaPath, &'a str),
    RequestAccepted(EditOperation, &'a SchemaPath),
    RequestRejected(EditOperation, &'a SchemaPath),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::RequestTx(operation, path, payload) => {
                debug_span!("crud", %operation, %path).in_scope(|| {
                    let segments =
                        serde_json::to_string(path).unwrap_or_default();
                    debug!(%segments, %payload, "{}", self);
                });
            }
            Debug::RequestAccepted(operation, path)
            | Debug::RequestRejected(operation, path) => {
                debug_span!("crud", %operation, %path).in_scope(|| {
                    debug!("{}", self);
                });
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::RequestTx(..) => {
                write!(f, "sending request")
            }
            Debug::RequestAccepted(..) => {
                write!(f, "request accepted")
            }
            Debug::RequestRejected(..) => {
                write!(f, "request rejected")
            }
        }
    }
}
