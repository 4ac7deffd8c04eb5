//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Bindings for a subset of the `openconfig-bgp` module:
//!
//! ```text
//! +--rw bgp
//!    +--rw global
//!    |  +--rw config
//!    |     +--rw as           oc-inet:as-number
//!    |     +--rw router-id?   oc-yang:dotted-quad
//!    +--rw neighbors
//!       +--rw neighbor* [neighbor-address]
//!          +--rw neighbor-address   -> ../config/neighbor-address
//!          +--rw config
//!             +--rw neighbor-address?   oc-inet:ip-address
//!             +--rw peer-as?            oc-inet:as-number
//!             +--rw description?        string
//!             +--rw enabled?            boolean
//! ```

use std::net::{IpAddr, Ipv4Addr};

use yangkit_entity::{Entity, EntityId, EntityTree, Error};

pub const MODULE_NAME: &str = "openconfig-bgp";
pub const NAMESPACE: &str = "http://openconfig.net/yang/bgp";

// /bgp
#[derive(Clone, Copy, Debug)]
pub struct Bgp {
    pub id: EntityId,
    pub global: Global,
    pub neighbors: Neighbors,
}

// /bgp/global
#[derive(Clone, Copy, Debug)]
pub struct Global {
    pub id: EntityId,
    pub config: GlobalConfig,
}

// /bgp/global/config
#[derive(Clone, Copy, Debug)]
pub struct GlobalConfig {
    pub id: EntityId,
}

// /bgp/neighbors
#[derive(Clone, Copy, Debug)]
pub struct Neighbors {
    pub id: EntityId,
}

// /bgp/neighbors/neighbor
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
    pub id: EntityId,
    pub config: NeighborConfig,
}

// /bgp/neighbors/neighbor/config
#[derive(Clone, Copy, Debug)]
pub struct NeighborConfig {
    pub id: EntityId,
}

// ===== impl Bgp =====

impl Bgp {
    pub const YANG_NAME: &'static str = "bgp";

    // Allocates the container nodes of the module. Parent links are left
    // unset; use `EntityTree::set_parent` or `Bgp::link` to wire them.
    pub fn new(tree: &mut EntityTree) -> Bgp {
        let id = tree.insert(Entity::top_level(
            MODULE_NAME,
            NAMESPACE,
            Self::YANG_NAME,
        ));
        Bgp {
            id,
            global: Global::new(tree),
            neighbors: Neighbors::new(tree),
        }
    }

    // Links every container node to its parent.
    pub fn link(&self, tree: &mut EntityTree) -> Result<(), Error> {
        tree.set_parent(self.global.id, self.id)?;
        tree.set_parent(self.global.config.id, self.global.id)?;
        tree.set_parent(self.neighbors.id, self.id)?;
        Ok(())
    }
}

// ===== impl Global =====

impl Global {
    pub const YANG_NAME: &'static str = "global";

    fn new(tree: &mut EntityTree) -> Global {
        let id = tree.insert(Entity::container(Self::YANG_NAME));
        Global {
            id,
            config: GlobalConfig::new(tree),
        }
    }
}

// ===== impl GlobalConfig =====

impl GlobalConfig {
    pub const YANG_NAME: &'static str = "config";

    fn new(tree: &mut EntityTree) -> GlobalConfig {
        let id = tree.insert(Entity::container(Self::YANG_NAME));
        GlobalConfig { id }
    }

    pub fn set_as(&self, tree: &mut EntityTree, asn: u32) -> Result<(), Error> {
        tree.set_value(self.id, "as", asn)
    }

    pub fn set_router_id(
        &self,
        tree: &mut EntityTree,
        router_id: Ipv4Addr,
    ) -> Result<(), Error> {
        tree.set_value(self.id, "router-id", router_id)
    }
}

// ===== impl Neighbors =====

impl Neighbors {
    pub const YANG_NAME: &'static str = "neighbors";

    fn new(tree: &mut EntityTree) -> Neighbors {
        let id = tree.insert(Entity::container(Self::YANG_NAME));
        Neighbors { id }
    }

    // Creates a new list entry. List entries are linked to the list's
    // parent container as soon as they're created.
    pub fn add_neighbor(
        &self,
        tree: &mut EntityTree,
        address: IpAddr,
    ) -> Result<Neighbor, Error> {
        let mut entry =
            Entity::list_entry(Neighbor::YANG_NAME, &[Neighbor::KEY]);
        entry.set_value(Neighbor::KEY, address);
        let id = tree.add_child(self.id, entry)?;

        let config = NeighborConfig::new(tree, id)?;
        config.set_neighbor_address(tree, address)?;

        Ok(Neighbor { id, config })
    }
}

// ===== impl Neighbor =====

impl Neighbor {
    pub const YANG_NAME: &'static str = "neighbor";
    pub const KEY: &'static str = "neighbor-address";
}

// ===== impl NeighborConfig =====

impl NeighborConfig {
    pub const YANG_NAME: &'static str = "config";

    fn new(
        tree: &mut EntityTree,
        parent: EntityId,
    ) -> Result<NeighborConfig, Error> {
        let id = tree.add_child(parent, Entity::container(Self::YANG_NAME))?;
        Ok(NeighborConfig { id })
    }

    pub fn set_neighbor_address(
        &self,
        tree: &mut EntityTree,
        address: IpAddr,
    ) -> Result<(), Error> {
        tree.set_value(self.id, "neighbor-address", address)
    }

    pub fn set_peer_as(
        &self,
        tree: &mut EntityTree,
        asn: u32,
    ) -> Result<(), Error> {
        tree.set_value(self.id, "peer-as", asn)
    }

    pub fn set_description(
        &self,
        tree: &mut EntityTree,
        description: &str,
    ) -> Result<(), Error> {
        tree.set_value(self.id, "description", description)
    }

    pub fn set_enabled(
        &self,
        tree: &mut EntityTree,
        enabled: bool,
    ) -> Result<(), Error> {
        tree.set_value(self.id, "enabled", enabled)
    }
}
