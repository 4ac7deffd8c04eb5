//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use crate::device::DeviceDescriptor;
use crate::dom::Element;
use crate::error::ConnectionError;
use crate::framing::{FrameDecoder, Framing};
use crate::message::{
    CAPABILITY_BASE_1_0, CAPABILITY_BASE_1_1, Capabilities, ErrorSeverity,
    ErrorTag, ErrorType, Hello, NETCONF_BASE_NS, RpcError, XML_DECLARATION,
};
use crate::transport::{BoxStream, Connector};

// Behavior of a stub device.
#[derive(Clone, Debug)]
pub struct StubOptions {
    pub username: String,
    pub password: String,
    pub reachable: bool,
    pub capabilities: Vec<String>,
    pub session_id: Option<u32>,
    // Whether the device sends its hello message.
    pub send_hello: bool,
    // Whether the device answers RPCs at all.
    pub reply: bool,
    // Answers every RPC with a wrong message-id.
    pub wrong_message_id: bool,
    // Raw reply body sent for every edit-config, which is then not
    // applied.
    pub edit_reply: Option<String>,
}

// In-process NETCONF device holding a set of configured data nodes.
//
// Nodes are identified by unprefixed paths like `/bgp/global/config`.
// A node exists when it or any of its descendants was configured.
#[derive(Clone, Debug)]
pub struct StubDevice {
    options: Arc<StubOptions>,
    state: Arc<Mutex<StubState>>,
}

// RPC received by a stub device.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StubRequest {
    pub message_id: Option<String>,
    pub operation: String,
    // Path and operation of every edit-config node marked with an
    // `operation` attribute.
    pub edits: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct StubConnector {
    device: StubDevice,
}

#[derive(Debug, Default)]
struct StubState {
    datastore: BTreeSet<String>,
    requests: Vec<StubRequest>,
    sessions: usize,
}

// ===== impl StubOptions =====

impl Default for StubOptions {
    fn default() -> StubOptions {
        StubOptions {
            username: "alice".to_owned(),
            password: "secret".to_owned(),
            reachable: true,
            capabilities: vec![
                CAPABILITY_BASE_1_0.to_owned(),
                CAPABILITY_BASE_1_1.to_owned(),
                "http://openconfig.net/yang/bgp?module=openconfig-bgp\
                 &revision=2023-12-28"
                    .to_owned(),
            ],
            session_id: Some(1),
            send_hello: true,
            reply: true,
            wrong_message_id: false,
            edit_reply: None,
        }
    }
}

// ===== impl StubDevice =====

impl StubDevice {
    pub fn new(options: StubOptions) -> StubDevice {
        StubDevice {
            options: Arc::new(options),
            state: Default::default(),
        }
    }

    pub fn connector(&self) -> Box<dyn Connector> {
        Box::new(StubConnector {
            device: self.clone(),
        })
    }

    pub fn add_config(&self, path: &str) {
        self.state().datastore.insert(path.to_owned());
    }

    pub fn contains(&self, path: &str) -> bool {
        exists(&self.state().datastore, path)
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.state().requests.clone()
    }

    // Edit-config requests received so far.
    pub fn edits(&self) -> Vec<(String, String)> {
        self.state()
            .requests
            .iter()
            .flat_map(|request| request.edits.iter().cloned())
            .collect()
    }

    pub fn sessions(&self) -> usize {
        self.state().sessions
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        // A panicking test thread must not hide the recorded state from
        // the others.
        self.state.lock().unwrap_or_else(|error| error.into_inner())
    }

    async fn serve(self, mut stream: DuplexStream) {
        let options = self.options.clone();
        self.state().sessions += 1;

        let mut decoder = FrameDecoder::new(Framing::EndOfMessage);
        if !options.send_hello {
            // Keep the session open without ever answering.
            while read_frame(&mut stream, &mut decoder).await.is_some() {}
            return;
        }

        let capabilities = options
            .capabilities
            .iter()
            .cloned()
            .collect::<Capabilities>();
        let hello = Hello::new(capabilities.clone(), options.session_id);
        let Ok(hello) = hello.encode() else {
            return;
        };
        let msg = Framing::EndOfMessage.encode(hello.as_bytes());
        if stream.write_all(&msg).await.is_err() {
            return;
        }

        let Some(data) = read_frame(&mut stream, &mut decoder).await else {
            return;
        };
        let Ok(client_hello) = Hello::decode(decoder_text(&data)) else {
            return;
        };
        let framing = if capabilities.contains(CAPABILITY_BASE_1_1)
            && client_hello.capabilities.contains(CAPABILITY_BASE_1_1)
        {
            Framing::Chunked
        } else {
            Framing::EndOfMessage
        };
        decoder.set_framing(framing);

        while let Some(data) = read_frame(&mut stream, &mut decoder).await {
            let Ok(rpc) = Element::parse(decoder_text(&data)) else {
                return;
            };
            if !options.reply {
                continue;
            }

            let (body, close) = self.process_rpc(&rpc);
            let message_id = match options.wrong_message_id {
                true => "0",
                false => rpc.attribute("message-id").unwrap_or_default(),
            };
            let reply = format!(
                "{}<rpc-reply xmlns=\"{}\" message-id=\"{}\">{}</rpc-reply>",
                XML_DECLARATION, NETCONF_BASE_NS, message_id, body
            );
            let msg = framing.encode(reply.as_bytes());
            if stream.write_all(&msg).await.is_err() || close {
                return;
            }
        }
    }

    // Applies one RPC and returns the reply body, and whether the session
    // must be closed afterwards.
    fn process_rpc(&self, rpc: &Element) -> (String, bool) {
        let mut state = self.state();
        let operation = rpc
            .children
            .first()
            .map(|op| op.name.clone())
            .unwrap_or_default();
        let mut request = StubRequest {
            message_id: rpc.attribute("message-id").map(str::to_owned),
            operation: operation.clone(),
            edits: vec![],
        };

        let result = match operation.as_str() {
            "edit-config" => {
                if let Some(config) = rpc.children[0].child("config") {
                    for node in &config.children {
                        collect_edits(node, "", &mut request.edits);
                    }
                }
                if let Some(body) = &self.options.edit_reply {
                    state.requests.push(request);
                    return (body.clone(), false);
                }
                apply_edits(&mut state.datastore, &request.edits)
            }
            "close-session" => Ok(()),
            _ => Err(RpcError::new(
                Some(ErrorType::Protocol),
                Some(ErrorTag::OperationNotSupported),
                ErrorSeverity::Error,
            )),
        };
        state.requests.push(request);

        let body = match result {
            Ok(()) => "<ok/>".to_owned(),
            Err(error) => error.encode().unwrap_or_default(),
        };
        (body, operation == "close-session")
    }
}

// ===== impl StubConnector =====

#[async_trait]
impl Connector for StubConnector {
    async fn connect(
        &self,
        device: &DeviceDescriptor,
    ) -> Result<BoxStream, ConnectionError> {
        let options = &self.device.options;
        if !options.reachable {
            return Err(ConnectionError::Unreachable(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "stub device unreachable",
            )));
        }
        if device.username != options.username
            || device.password != options.password
        {
            return Err(ConnectionError::AuthenticationFailed(
                device.username.clone(),
            ));
        }

        let (client, server) = tokio::io::duplex(64 * 1024);
        tokio::spawn(self.device.clone().serve(server));
        Ok(Box::pin(client))
    }
}

// ===== helper functions =====

async fn read_frame(
    stream: &mut DuplexStream,
    decoder: &mut FrameDecoder,
) -> Option<Bytes> {
    loop {
        if let Some(msg) = decoder.decode().ok()? {
            return Some(msg);
        }
        match stream.read_buf(decoder.buffer_mut()).await {
            Ok(0) | Err(_) => return None,
            Ok(_) => (),
        }
    }
}

fn decoder_text(data: &[u8]) -> &str {
    std::str::from_utf8(data).unwrap_or_default().trim()
}

// Builds the stub path of a data node. Leaf children become predicates.
fn segment(node: &Element) -> String {
    let mut segment = node.name.clone();
    for leaf in node.children.iter().filter(|child| child.children.is_empty())
    {
        if !leaf.text().is_empty() {
            segment.push_str(&format!("[{}='{}']", leaf.name, leaf.text()));
        }
    }
    segment
}

fn collect_edits(
    node: &Element,
    parent_path: &str,
    edits: &mut Vec<(String, String)>,
) {
    if node.children.is_empty() && !node.text().is_empty() {
        return;
    }
    let path = format!("{}/{}", parent_path, segment(node));
    if let Some(operation) = node.attribute("operation") {
        edits.push((path.clone(), operation.to_owned()));
    }
    for child in &node.children {
        collect_edits(child, &path, edits);
    }
}

fn exists(datastore: &BTreeSet<String>, path: &str) -> bool {
    let prefix = format!("{}/", path);
    datastore
        .iter()
        .any(|node| node == path || node.starts_with(&prefix))
}

fn apply_edits(
    datastore: &mut BTreeSet<String>,
    edits: &[(String, String)],
) -> Result<(), RpcError> {
    for (path, operation) in edits {
        match operation.as_str() {
            "delete" | "remove" => {
                if !exists(datastore, path) {
                    if operation == "remove" {
                        continue;
                    }
                    let mut error = RpcError::new(
                        Some(ErrorType::Application),
                        Some(ErrorTag::DataMissing),
                        ErrorSeverity::Error,
                    );
                    error.path = Some(path.clone());
                    error.message = Some("Data does not exist".to_owned());
                    return Err(error);
                }
                let prefix = format!("{}/", path);
                datastore.retain(|node| {
                    node != path && !node.starts_with(&prefix)
                });
            }
            _ => {
                datastore.insert(path.clone());
            }
        }
    }
    Ok(())
}
