//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::tree::EntityId;
use crate::value::Value;

// One instance of a YANG container, list entry or top-level container.
//
// Parent and child links are owned by the `EntityTree` and can only be
// changed through it, which keeps both directions in agreement.
#[derive(Clone, Debug)]
pub struct Entity {
    yang_name: String,
    // Module name and XML namespace, set only on top-level nodes.
    module_name: Option<String>,
    namespace: Option<String>,
    list_keys: Vec<String>,
    leafs: Vec<(String, Value)>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
}

// ===== impl Entity =====

impl Entity {
    // Creates a top-level container of the given module.
    pub fn top_level(
        module_name: &str,
        namespace: &str,
        yang_name: &str,
    ) -> Entity {
        let mut entity = Entity::container(yang_name);
        entity.module_name = Some(module_name.to_owned());
        entity.namespace = Some(namespace.to_owned());
        entity
    }

    // Creates a non-top-level container.
    pub fn container(yang_name: &str) -> Entity {
        Entity {
            yang_name: yang_name.to_owned(),
            module_name: None,
            namespace: None,
            list_keys: vec![],
            leafs: vec![],
            parent: None,
            children: vec![],
        }
    }

    // Creates a list entry identified by the given key leafs.
    pub fn list_entry(yang_name: &str, list_keys: &[&str]) -> Entity {
        let mut entity = Entity::container(yang_name);
        entity.list_keys =
            list_keys.iter().map(|key| (*key).to_owned()).collect();
        entity
    }

    pub fn yang_name(&self) -> &str {
        &self.yang_name
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn is_top_level(&self) -> bool {
        self.module_name.is_some()
    }

    pub fn list_keys(&self) -> &[String] {
        &self.list_keys
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn value(&self, leaf: &str) -> Option<&Value> {
        self.leafs
            .iter()
            .find(|(name, _)| name == leaf)
            .map(|(_, value)| value)
    }

    // Sets the value of a leaf. Leafs keep the order in which they were
    // first set.
    pub fn set_value(&mut self, leaf: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.leafs.iter_mut().find(|(name, _)| name == leaf) {
            Some((_, old)) => *old = value,
            None => self.leafs.push((leaf.to_owned(), value)),
        }
    }

    pub fn leafs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.leafs.iter().map(|(name, value)| (name.as_str(), value))
    }
}
