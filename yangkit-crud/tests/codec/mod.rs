//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv4Addr};

use yangkit_crud::Error;
use yangkit_crud::codec::encode_operation;
use yangkit_entity::{Entity, EntityTree};
use yangkit_models::openconfig_bgp::{self, Bgp};
use yangkit_netconf::dom::Element;
use yangkit_netconf::message::{EditOperation, NETCONF_BASE_NS};

//
// Helper functions.
//

fn linked_bgp() -> (EntityTree, Bgp) {
    let mut tree = EntityTree::new();
    let bgp = Bgp::new(&mut tree);
    bgp.link(&mut tree).unwrap();
    (tree, bgp)
}

//
// Tests.
//

#[test]
fn test_encode_delete_container() {
    let (mut tree, bgp) = linked_bgp();
    bgp.global.config.set_as(&mut tree, 65000).unwrap();

    let payload =
        encode_operation(&tree, bgp.global.config.id, EditOperation::Delete)
            .unwrap();
    let root = Element::parse(&payload).unwrap();
    assert_eq!(root.name, "bgp");
    assert_eq!(root.namespace.as_deref(), Some(openconfig_bgp::NAMESPACE));
    assert_eq!(root.children.len(), 1);

    let global = &root.children[0];
    assert_eq!(global.name, "global");
    assert_eq!(global.namespace.as_deref(), Some(openconfig_bgp::NAMESPACE));
    assert!(global.attributes.is_empty());

    // Leafs aren't needed to delete a node.
    let config = &global.children[0];
    assert_eq!(config.name, "config");
    assert_eq!(config.attribute("operation"), Some("delete"));
    assert!(config.children.is_empty());
    assert!(payload.contains(&format!(r#"xmlns:nc="{}""#, NETCONF_BASE_NS)));
}

#[test]
fn test_encode_list_entry() {
    let (mut tree, bgp) = linked_bgp();
    let address = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    let neighbor = bgp.neighbors.add_neighbor(&mut tree, address).unwrap();
    neighbor.config.set_peer_as(&mut tree, 65001).unwrap();

    let payload =
        encode_operation(&tree, neighbor.config.id, EditOperation::Delete)
            .unwrap();
    let root = Element::parse(&payload).unwrap();
    let entry = &root.children[0].children[0];
    assert_eq!(entry.name, "neighbor");
    assert_eq!(entry.child_text("neighbor-address"), Some("192.0.2.1"));
    assert_eq!(entry.attribute("operation"), None);

    let config = entry.child("config").unwrap();
    assert_eq!(config.attribute("operation"), Some("delete"));
    assert!(config.children.is_empty());
}

#[test]
fn test_encode_merge_includes_leafs() {
    let (mut tree, bgp) = linked_bgp();
    bgp.global.config.set_as(&mut tree, 65000).unwrap();
    bgp.global
        .config
        .set_router_id(&mut tree, Ipv4Addr::new(10, 0, 0, 1))
        .unwrap();

    let payload =
        encode_operation(&tree, bgp.global.config.id, EditOperation::Merge)
            .unwrap();
    let root = Element::parse(&payload).unwrap();
    let config = &root.children[0].children[0];
    assert_eq!(config.attribute("operation"), Some("merge"));
    assert_eq!(config.child_text("as"), Some("65000"));
    assert_eq!(config.child_text("router-id"), Some("10.0.0.1"));
}

#[test]
fn test_encode_unresolved_chain() {
    let mut tree = EntityTree::new();
    let bgp = Bgp::new(&mut tree);
    tree.set_parent(bgp.global.config.id, bgp.global.id).unwrap();

    assert!(matches!(
        encode_operation(&tree, bgp.global.config.id, EditOperation::Delete),
        Err(Error::Entity(
            yangkit_entity::Error::UnresolvedAncestor { .. }
        ))
    ));
}

#[test]
fn test_encode_missing_key() {
    let (mut tree, bgp) = linked_bgp();
    let entry = tree
        .add_child(
            bgp.neighbors.id,
            Entity::list_entry("neighbor", &["neighbor-address"]),
        )
        .unwrap();

    assert!(matches!(
        encode_operation(&tree, entry, EditOperation::Delete),
        Err(Error::Entity(yangkit_entity::Error::MissingListKey { .. }))
    ));
}
