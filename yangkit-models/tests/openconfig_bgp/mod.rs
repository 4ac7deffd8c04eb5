//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv4Addr};

use yangkit_entity::{EntityTree, Error, Value};
use yangkit_models::openconfig_bgp::Bgp;

//
// Tests.
//

#[test]
fn test_new_bgp_is_unlinked() {
    let mut tree = EntityTree::new();
    let bgp = Bgp::new(&mut tree);

    assert_eq!(tree.parent(bgp.global.id).unwrap(), None);
    assert_eq!(tree.parent(bgp.global.config.id).unwrap(), None);
    assert!(matches!(
        tree.schema_path(bgp.global.config.id),
        Err(Error::UnresolvedAncestor { .. })
    ));
}

#[test]
fn test_explicit_links() {
    let mut tree = EntityTree::new();
    let bgp = Bgp::new(&mut tree);
    tree.set_parent(bgp.global.id, bgp.id).unwrap();
    tree.set_parent(bgp.global.config.id, bgp.global.id).unwrap();

    assert_eq!(
        tree.absolute_path(bgp.global.config.id).unwrap(),
        "/openconfig-bgp:bgp/global/config"
    );
    tree.check_consistency().unwrap();
}

#[test]
fn test_link_all() {
    let mut tree = EntityTree::new();
    let bgp = Bgp::new(&mut tree);
    bgp.link(&mut tree).unwrap();

    assert_eq!(
        tree.children(bgp.id).unwrap(),
        &[bgp.global.id, bgp.neighbors.id]
    );
    tree.check_consistency().unwrap();
}

#[test]
fn test_global_config_leafs() {
    let mut tree = EntityTree::new();
    let bgp = Bgp::new(&mut tree);
    let config = bgp.global.config;
    config.set_as(&mut tree, 65001).unwrap();
    config
        .set_router_id(&mut tree, Ipv4Addr::new(10, 0, 0, 5))
        .unwrap();

    assert_eq!(
        tree.value(config.id, "as").unwrap(),
        Some(&Value::Uint(65001))
    );
    assert_eq!(
        tree.value(config.id, "router-id").unwrap(),
        Some(&Value::String("10.0.0.5".to_owned()))
    );
}

#[test]
fn test_neighbor_entry() {
    let mut tree = EntityTree::new();
    let bgp = Bgp::new(&mut tree);
    bgp.link(&mut tree).unwrap();

    let addr: IpAddr = "192.0.2.1".parse().unwrap();
    let neighbor = bgp.neighbors.add_neighbor(&mut tree, addr).unwrap();
    neighbor.config.set_peer_as(&mut tree, 65100).unwrap();
    neighbor.config.set_description(&mut tree, "upstream").unwrap();
    neighbor.config.set_enabled(&mut tree, true).unwrap();

    assert_eq!(
        tree.absolute_path(neighbor.config.id).unwrap(),
        "/openconfig-bgp:bgp/neighbors/neighbor[neighbor-address='192.0.2.1']/config"
    );
    assert_eq!(
        tree.value(neighbor.config.id, "neighbor-address").unwrap(),
        Some(&Value::String("192.0.2.1".to_owned()))
    );
    tree.check_consistency().unwrap();
}
