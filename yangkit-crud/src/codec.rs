//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use xml::writer::{EmitterConfig, EventWriter, XmlEvent};
use yangkit_entity::{Entity, EntityId, EntityTree};
use yangkit_netconf::message::{EditOperation, NETCONF_BASE_NS};

use crate::error::Error;

// Encodes an edit-config payload applying `operation` to the target node.
//
// The payload holds every ancestor of the target, from the top-level node
// down, each with its list keys so that the device can locate the target.
// The target element carries the `nc:operation` attribute. Its own leafs
// are included unless the operation removes the node.
pub fn encode_operation(
    tree: &EntityTree,
    target: EntityId,
    operation: EditOperation,
) -> Result<String, Error> {
    tree.top_entity(target)?;
    let mut chain = tree.ancestors(target).collect::<Vec<_>>();
    chain.reverse();

    let mut writer = EmitterConfig::new()
        .write_document_declaration(false)
        .perform_indent(false)
        .create_writer(Vec::new());

    for id in &chain {
        let entity = tree.get(*id)?;
        write_start(&mut writer, entity, None)?;
        write_keys(tree, &mut writer, *id)?;
    }

    let entity = tree.get(target)?;
    write_start(&mut writer, entity, Some(operation))?;
    write_keys(tree, &mut writer, target)?;
    if !matches!(operation, EditOperation::Delete | EditOperation::Remove) {
        for (leaf, value) in entity.leafs() {
            if entity.list_keys().iter().any(|key| key == leaf) {
                continue;
            }
            write_leaf(&mut writer, leaf, &value.to_string())?;
        }
    }

    for _ in 0..=chain.len() {
        writer.write(XmlEvent::end_element())?;
    }

    // The emitter only produces UTF-8.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

// ===== helper functions =====

fn write_start(
    writer: &mut EventWriter<Vec<u8>>,
    entity: &Entity,
    operation: Option<EditOperation>,
) -> Result<(), Error> {
    let mut start = XmlEvent::start_element(entity.yang_name());
    if let Some(namespace) = entity.namespace() {
        start = start.default_ns(namespace);
    }
    if let Some(operation) = operation {
        start = start
            .ns("nc", NETCONF_BASE_NS)
            .attr("nc:operation", operation.as_str());
    }
    writer.write(start)?;
    Ok(())
}

fn write_keys(
    tree: &EntityTree,
    writer: &mut EventWriter<Vec<u8>>,
    id: EntityId,
) -> Result<(), Error> {
    // Resolves every key or fails with a missing-key error.
    let segment = tree.segment_path(id)?;
    for (key, value) in &segment.keys {
        write_leaf(writer, key, value)?;
    }
    Ok(())
}

fn write_leaf(
    writer: &mut EventWriter<Vec<u8>>,
    name: &str,
    value: &str,
) -> Result<(), Error> {
    writer.write(XmlEvent::start_element(name))?;
    if !value.is_empty() {
        writer.write(XmlEvent::characters(value))?;
    }
    writer.write(XmlEvent::end_element())?;
    Ok(())
}
