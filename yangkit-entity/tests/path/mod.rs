//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use yangkit_entity::{Entity, EntityTree, Error, PathSegment};

const NS: &str = "http://openconfig.net/yang/bgp";

//
// Tests.
//

#[test]
fn test_container_path() {
    let mut tree = EntityTree::new();
    let bgp = tree.insert(Entity::top_level("openconfig-bgp", NS, "bgp"));
    let global = tree.add_child(bgp, Entity::container("global")).unwrap();
    let config = tree.add_child(global, Entity::container("config")).unwrap();

    assert_eq!(
        tree.absolute_path(config).unwrap(),
        "/openconfig-bgp:bgp/global/config"
    );
    let path = tree.schema_path(config).unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(
        path.first(),
        Some(&PathSegment::new(
            Some("openconfig-bgp".to_owned()),
            "bgp".to_owned(),
            vec![]
        ))
    );
    assert_eq!(tree.absolute_path(bgp).unwrap(), "/openconfig-bgp:bgp");
}

#[test]
fn test_list_entry_path() {
    let mut tree = EntityTree::new();
    let bgp = tree.insert(Entity::top_level("openconfig-bgp", NS, "bgp"));
    let neighbors =
        tree.add_child(bgp, Entity::container("neighbors")).unwrap();
    let mut entry = Entity::list_entry("neighbor", &["neighbor-address"]);
    entry.set_value("neighbor-address", "10.0.0.1");
    let neighbor = tree.add_child(neighbors, entry).unwrap();
    let config = tree.add_child(neighbor, Entity::container("config")).unwrap();

    assert_eq!(
        tree.absolute_path(config).unwrap(),
        "/openconfig-bgp:bgp/neighbors/neighbor[neighbor-address='10.0.0.1']/config"
    );
}

#[test]
fn test_key_with_single_quote() {
    let mut tree = EntityTree::new();
    let top = tree.insert(Entity::top_level("example", "urn:example", "top"));
    let mut entry = Entity::list_entry("item", &["name"]);
    entry.set_value("name", "o'neil");
    let item = tree.add_child(top, entry).unwrap();

    assert_eq!(
        tree.absolute_path(item).unwrap(),
        "/example:top/item[name=\"o'neil\"]"
    );
}

#[test]
fn test_missing_list_key() {
    let mut tree = EntityTree::new();
    let bgp = tree.insert(Entity::top_level("openconfig-bgp", NS, "bgp"));
    let neighbors =
        tree.add_child(bgp, Entity::container("neighbors")).unwrap();
    let entry = Entity::list_entry("neighbor", &["neighbor-address"]);
    let neighbor = tree.add_child(neighbors, entry).unwrap();

    assert_eq!(
        tree.schema_path(neighbor),
        Err(Error::MissingListKey {
            entity: "neighbor".to_owned(),
            key: "neighbor-address".to_owned(),
        })
    );
}

#[test]
fn test_key_with_both_quotes() {
    let mut tree = EntityTree::new();
    let top = tree.insert(Entity::top_level("example", "urn:example", "top"));
    let mut entry = Entity::list_entry("item", &["name"]);
    entry.set_value("name", "it's \"x\"");
    let item = tree.add_child(top, entry).unwrap();

    let error = || Error::UnquotableKey {
        entity: "item".to_owned(),
        key: "name".to_owned(),
    };
    assert_eq!(tree.segment_path(item), Err(error()));
    assert_eq!(tree.absolute_path(item), Err(error()));
}
