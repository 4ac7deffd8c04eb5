//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;

use derive_new::new;
use enum_as_inner::EnumAsInner;
use serde::Serialize;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use crate::dom::Element;
use crate::error::{HandshakeError, ProtocolError, RemoteError};

pub const NETCONF_BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
pub const CAPABILITY_BASE_1_0: &str = "urn:ietf:params:netconf:base:1.0";
pub const CAPABILITY_BASE_1_1: &str = "urn:ietf:params:netconf:base:1.1";

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

// Set of capability URIs advertised in a hello message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Serialize)]
pub struct Capabilities(BTreeSet<String>);

#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Serialize)]
pub struct Hello {
    pub capabilities: Capabilities,
    pub session_id: Option<u32>,
}

// Protocol-level request: addressing path, operation kind and payload.
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Serialize)]
pub struct Request {
    pub path: Option<String>,
    pub operation: Operation,
    pub payload: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum Operation {
    EditConfig,
    CloseSession,
}

// Values of the `operation` attribute in edit-config payloads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum EditOperation {
    Merge,
    Replace,
    Create,
    Delete,
    Remove,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub struct RpcReply {
    pub message_id: Option<String>,
    pub body: ReplyBody,
    // Errors and warnings reported by the device.
    pub errors: Vec<RpcError>,
}

#[derive(Clone, Debug, EnumAsInner, Eq, PartialEq)]
#[derive(Serialize)]
pub enum ReplyBody {
    Ok,
    Data(Element),
    Empty,
}

// Error or warning reported in an `<rpc-error>` element.
//
// Devices don't always fill in every field, so only the severity is
// mandatory. A missing severity is taken as `error`.
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Serialize)]
pub struct RpcError {
    pub error_type: Option<ErrorType>,
    pub tag: Option<ErrorTag>,
    pub severity: ErrorSeverity,
    #[new(default)]
    pub app_tag: Option<String>,
    #[new(default)]
    pub path: Option<String>,
    #[new(default)]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum ErrorType {
    Transport,
    Rpc,
    Protocol,
    Application,
}

// RFC 6241, Appendix A. Tags outside of that list are kept verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum ErrorTag {
    InUse,
    InvalidValue,
    TooBig,
    MissingAttribute,
    BadAttribute,
    UnknownAttribute,
    MissingElement,
    BadElement,
    UnknownElement,
    UnknownNamespace,
    AccessDenied,
    LockDenied,
    ResourceDenied,
    RollbackFailed,
    DataExists,
    DataMissing,
    OperationNotSupported,
    OperationFailed,
    PartialOperation,
    MalformedMessage,
    Other(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum ErrorSeverity {
    Error,
    Warning,
}

// ===== impl Capabilities =====

impl Capabilities {
    // Capabilities advertised by this client.
    pub fn client() -> Capabilities {
        [CAPABILITY_BASE_1_0, CAPABILITY_BASE_1_1]
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    // Checks for a capability, ignoring any query parameters.
    pub fn contains(&self, capability: &str) -> bool {
        self.0
            .iter()
            .any(|cap| cap.split('?').next() == Some(capability))
    }

    pub fn supports_base(&self) -> bool {
        self.contains(CAPABILITY_BASE_1_0) || self.contains(CAPABILITY_BASE_1_1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for Capabilities {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Capabilities {
        Capabilities(iter.into_iter().collect())
    }
}

// ===== impl Hello =====

impl Hello {
    pub fn client() -> Hello {
        Hello::new(Capabilities::client(), None)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        encode_xml(true, |writer| {
            writer.write(
                XmlEvent::start_element("hello").default_ns(NETCONF_BASE_NS),
            )?;
            writer.write(XmlEvent::start_element("capabilities"))?;
            for capability in self.capabilities.iter() {
                write_text(writer, "capability", capability)?;
            }
            writer.write(XmlEvent::end_element())?;
            if let Some(session_id) = self.session_id {
                write_text(writer, "session-id", &session_id.to_string())?;
            }
            writer.write(XmlEvent::end_element())
        })
    }

    pub fn decode(data: &str) -> Result<Hello, HandshakeError> {
        let root =
            Element::parse(data).map_err(HandshakeError::MalformedHello)?;
        if root.name != "hello" {
            return Err(HandshakeError::MalformedHello(format!(
                "unexpected <{}> element",
                root.name
            )));
        }

        let capabilities = root
            .child("capabilities")
            .ok_or_else(|| {
                HandshakeError::MalformedHello("missing capabilities".into())
            })?
            .children_named("capability")
            .map(|capability| capability.text().to_owned())
            .collect::<Capabilities>();

        let session_id = match root.child_text("session-id") {
            Some(session_id) => match session_id.parse::<u32>() {
                Ok(session_id) if session_id != 0 => Some(session_id),
                _ => {
                    return Err(HandshakeError::MalformedHello(format!(
                        "invalid session-id '{}'",
                        session_id
                    )));
                }
            },
            None => None,
        };

        Ok(Hello::new(capabilities, session_id))
    }
}

// ===== impl Request =====

impl Request {
    pub fn edit_config(path: impl Into<String>, payload: String) -> Request {
        Request::new(Some(path.into()), Operation::EditConfig, payload)
    }

    pub fn close_session() -> Request {
        Request::new(None, Operation::CloseSession, String::new())
    }

    // Checks the request before anything is written to the session.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self.operation {
            Operation::EditConfig => {
                if self.payload.trim().is_empty() {
                    return Err(ProtocolError::MalformedRequest(
                        "empty edit-config payload".into(),
                    ));
                }
                // The payload may hold several top-level elements.
                let wrapped = format!("<config>{}</config>", self.payload);
                Element::parse(&wrapped)
                    .map_err(ProtocolError::MalformedRequest)?;
                Ok(())
            }
            Operation::CloseSession => Ok(()),
        }
    }

    pub fn encode(&self, message_id: u64) -> Result<String, ProtocolError> {
        let message_id = message_id.to_string();
        encode_xml(true, |writer| {
            writer.write(
                XmlEvent::start_element("rpc")
                    .default_ns(NETCONF_BASE_NS)
                    .attr("message-id", &message_id),
            )?;
            match self.operation {
                Operation::EditConfig => {
                    writer.write(XmlEvent::start_element("edit-config"))?;
                    writer.write(XmlEvent::start_element("target"))?;
                    writer.write(XmlEvent::start_element("running"))?;
                    writer.write(XmlEvent::end_element())?;
                    writer.write(XmlEvent::end_element())?;
                    writer.write(XmlEvent::start_element("config"))?;
                    // Empty text closes the start tag, so the payload,
                    // already checked by `validate`, can be copied as is.
                    writer.write(XmlEvent::characters(""))?;
                    let payload = self.payload.as_bytes();
                    writer.inner_mut().extend_from_slice(payload);
                    writer.write(XmlEvent::end_element())?;
                    writer.write(XmlEvent::end_element())?;
                }
                Operation::CloseSession => {
                    writer.write(XmlEvent::start_element("close-session"))?;
                    writer.write(XmlEvent::end_element())?;
                }
            }
            writer.write(XmlEvent::end_element())
        })
    }
}

// ===== impl Operation =====

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::EditConfig => write!(f, "edit-config"),
            Operation::CloseSession => write!(f, "close-session"),
        }
    }
}

// ===== impl EditOperation =====

impl EditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditOperation::Merge => "merge",
            EditOperation::Replace => "replace",
            EditOperation::Create => "create",
            EditOperation::Delete => "delete",
            EditOperation::Remove => "remove",
        }
    }
}

impl std::fmt::Display for EditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ===== impl RpcReply =====

impl RpcReply {
    pub fn decode(data: &str) -> Result<RpcReply, ProtocolError> {
        let root = Element::parse(data).map_err(ProtocolError::MalformedReply)?;
        if root.name != "rpc-reply" {
            return Err(ProtocolError::MalformedReply(format!(
                "unexpected <{}> element",
                root.name
            )));
        }

        let errors = root
            .children_named("rpc-error")
            .map(RpcError::decode)
            .collect::<Vec<_>>();
        let body = if root.child("ok").is_some() {
            ReplyBody::Ok
        } else if let Some(data) = root.child("data") {
            ReplyBody::Data(data.clone())
        } else if !errors.is_empty() {
            ReplyBody::Empty
        } else {
            return Err(ProtocolError::MalformedReply(
                "empty rpc-reply".into(),
            ));
        };

        Ok(RpcReply {
            message_id: root.attribute("message-id").map(str::to_owned),
            body,
            errors,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|error| error.severity == ErrorSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &RpcError> {
        self.errors
            .iter()
            .filter(|error| error.severity == ErrorSeverity::Warning)
    }

    // Turns a reply carrying errors into a `RemoteError`. Warnings alone
    // don't make the request fail.
    pub fn into_result(self) -> Result<RpcReply, RemoteError> {
        if self.has_errors() {
            return Err(RemoteError {
                errors: self.errors,
            });
        }
        Ok(self)
    }
}

// ===== impl RpcError =====

impl RpcError {
    // Only a well-formed element is required. Unknown or missing fields
    // must not hide the fact that the device rejected the request.
    fn decode(element: &Element) -> RpcError {
        let field = |name: &str| {
            element
                .child_text(name)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        let error_type = element
            .child_text("error-type")
            .and_then(ErrorType::from_name);
        let tag = element.child_text("error-tag").map(ErrorTag::from_name);
        let severity = element
            .child_text("error-severity")
            .and_then(ErrorSeverity::from_name)
            .unwrap_or(ErrorSeverity::Error);

        let mut error = RpcError::new(error_type, tag, severity);
        error.app_tag = field("error-app-tag");
        error.path = field("error-path");
        error.message = field("error-message");
        error
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        encode_xml(false, |writer| {
            writer.write(XmlEvent::start_element("rpc-error"))?;
            if let Some(error_type) = &self.error_type {
                write_text(writer, "error-type", &error_type.to_string())?;
            }
            if let Some(tag) = &self.tag {
                write_text(writer, "error-tag", tag.as_str())?;
            }
            write_text(writer, "error-severity", &self.severity.to_string())?;
            if let Some(app_tag) = &self.app_tag {
                write_text(writer, "error-app-tag", app_tag)?;
            }
            if let Some(path) = &self.path {
                write_text(writer, "error-path", path)?;
            }
            if let Some(message) = &self.message {
                writer.write(
                    XmlEvent::start_element("error-message")
                        .attr("xml:lang", "en"),
                )?;
                writer.write(XmlEvent::characters(message))?;
                writer.write(XmlEvent::end_element())?;
            }
            writer.write(XmlEvent::end_element())
        })
    }
}

// ===== impl ErrorType =====

impl ErrorType {
    pub fn from_name(name: &str) -> Option<ErrorType> {
        match name {
            "transport" => Some(ErrorType::Transport),
            "rpc" => Some(ErrorType::Rpc),
            "protocol" => Some(ErrorType::Protocol),
            "application" => Some(ErrorType::Application),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::Transport => write!(f, "transport"),
            ErrorType::Rpc => write!(f, "rpc"),
            ErrorType::Protocol => write!(f, "protocol"),
            ErrorType::Application => write!(f, "application"),
        }
    }
}

// ===== impl ErrorTag =====

impl ErrorTag {
    pub fn from_name(name: &str) -> ErrorTag {
        match name {
            "in-use" => ErrorTag::InUse,
            "invalid-value" => ErrorTag::InvalidValue,
            "too-big" => ErrorTag::TooBig,
            "missing-attribute" => ErrorTag::MissingAttribute,
            "bad-attribute" => ErrorTag::BadAttribute,
            "unknown-attribute" => ErrorTag::UnknownAttribute,
            "missing-element" => ErrorTag::MissingElement,
            "bad-element" => ErrorTag::BadElement,
            "unknown-element" => ErrorTag::UnknownElement,
            "unknown-namespace" => ErrorTag::UnknownNamespace,
            "access-denied" => ErrorTag::AccessDenied,
            "lock-denied" => ErrorTag::LockDenied,
            "resource-denied" => ErrorTag::ResourceDenied,
            "rollback-failed" => ErrorTag::RollbackFailed,
            "data-exists" => ErrorTag::DataExists,
            "data-missing" => ErrorTag::DataMissing,
            "operation-not-supported" => ErrorTag::OperationNotSupported,
            "operation-failed" => ErrorTag::OperationFailed,
            "partial-operation" => ErrorTag::PartialOperation,
            "malformed-message" => ErrorTag::MalformedMessage,
            _ => ErrorTag::Other(name.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorTag::InUse => "in-use",
            ErrorTag::InvalidValue => "invalid-value",
            ErrorTag::TooBig => "too-big",
            ErrorTag::MissingAttribute => "missing-attribute",
            ErrorTag::BadAttribute => "bad-attribute",
            ErrorTag::UnknownAttribute => "unknown-attribute",
            ErrorTag::MissingElement => "missing-element",
            ErrorTag::BadElement => "bad-element",
            ErrorTag::UnknownElement => "unknown-element",
            ErrorTag::UnknownNamespace => "unknown-namespace",
            ErrorTag::AccessDenied => "access-denied",
            ErrorTag::LockDenied => "lock-denied",
            ErrorTag::ResourceDenied => "resource-denied",
            ErrorTag::RollbackFailed => "rollback-failed",
            ErrorTag::DataExists => "data-exists",
            ErrorTag::DataMissing => "data-missing",
            ErrorTag::OperationNotSupported => "operation-not-supported",
            ErrorTag::OperationFailed => "operation-failed",
            ErrorTag::PartialOperation => "partial-operation",
            ErrorTag::MalformedMessage => "malformed-message",
            ErrorTag::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for ErrorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ===== impl ErrorSeverity =====

impl ErrorSeverity {
    pub fn from_name(name: &str) -> Option<ErrorSeverity> {
        match name {
            "error" => Some(ErrorSeverity::Error),
            "warning" => Some(ErrorSeverity::Warning),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Warning => write!(f, "warning"),
        }
    }
}

// ===== helper functions =====

// Runs `write` over a fresh XML writer and returns the document.
fn encode_xml<F>(declaration: bool, write: F) -> Result<String, ProtocolError>
where
    F: FnOnce(&mut EventWriter<Vec<u8>>) -> Result<(), xml::writer::Error>,
{
    let mut writer = EmitterConfig::new()
        .write_document_declaration(false)
        .perform_indent(false)
        .create_writer(Vec::new());

    let mut result = Ok(());
    if declaration {
        result = writer.write(XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("UTF-8"),
            standalone: None,
        });
    }
    result
        .and_then(|_| write(&mut writer))
        .map_err(|error| ProtocolError::MalformedRequest(error.to_string()))?;

    // The emitter only produces UTF-8.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_text(
    writer: &mut EventWriter<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), xml::writer::Error> {
    writer.write(XmlEvent::start_element(name))?;
    writer.write(XmlEvent::characters(text))?;
    writer.write(XmlEvent::end_element())
}
