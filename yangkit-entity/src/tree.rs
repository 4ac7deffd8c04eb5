//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use generational_arena::{Arena, Index};

use crate::entity::Entity;
use crate::error::Error;
use crate::path::{PathSegment, SchemaPath};
use crate::value::Value;

// Stable handle to an entity stored in an `EntityTree`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityId(Index);

// Arena owning all entities of one or more YANG data trees.
//
// Children are owned by the arena, not by their parent. A child refers to
// its parent by id only, so the upward link never keeps anything alive.
#[derive(Debug, Default)]
pub struct EntityTree {
    arena: Arena<Entity>,
}

// Iterator over the strict ancestors of an entity, nearest first.
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a EntityTree,
    next: Option<EntityId>,
}

// ===== impl EntityId =====

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (index, generation) = self.0.into_raw_parts();
        write!(f, "{}v{}", index, generation)
    }
}

// ===== impl EntityTree =====

impl EntityTree {
    pub fn new() -> EntityTree {
        EntityTree::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    // Adds a detached entity to the arena.
    //
    // Links carried over from a cloned entity are dropped, since they
    // belong to the original.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        entity.parent = None;
        entity.children.clear();
        EntityId(self.arena.insert(entity))
    }

    // Adds an entity to the arena and links it under `parent`.
    pub fn add_child(
        &mut self,
        parent: EntityId,
        entity: Entity,
    ) -> Result<EntityId, Error> {
        self.get(parent)?;
        let child = self.insert(entity);
        if let Err(error) = self.set_parent(child, parent) {
            self.arena.remove(child.0);
            return Err(error);
        }
        Ok(child)
    }

    // Links `child` under `parent`, detaching it from its previous parent
    // first.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: EntityId,
    ) -> Result<(), Error> {
        if self.get(child)?.is_top_level() {
            return Err(Error::ParentIsTopLevel(child));
        }
        self.get(parent)?;

        // Reject links that would make the child its own ancestor.
        if child == parent || self.ancestors(parent).any(|id| id == child) {
            return Err(Error::ParentCycle(child, parent));
        }

        let old_parent = self.arena[child.0].parent;
        if old_parent == Some(parent) {
            return Ok(());
        }
        if let Some(old_parent) = old_parent {
            self.arena[old_parent.0].children.retain(|id| *id != child);
        }
        self.arena[parent.0].children.push(child);
        self.arena[child.0].parent = Some(parent);

        Ok(())
    }

    pub fn get(&self, id: EntityId) -> Result<&Entity, Error> {
        self.arena.get(id.0).ok_or(Error::EntityNotFound(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, Error> {
        self.arena.get_mut(id.0).ok_or(Error::EntityNotFound(id))
    }

    pub fn parent(&self, id: EntityId) -> Result<Option<EntityId>, Error> {
        self.get(id).map(|entity| entity.parent)
    }

    pub fn children(&self, id: EntityId) -> Result<&[EntityId], Error> {
        self.get(id).map(|entity| entity.children())
    }

    pub fn ancestors(&self, id: EntityId) -> Ancestors<'_> {
        let next = self.arena.get(id.0).and_then(|entity| entity.parent);
        Ancestors { tree: self, next }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.arena.iter().map(|(index, entity)| (EntityId(index), entity))
    }

    pub fn set_value(
        &mut self,
        id: EntityId,
        leaf: &str,
        value: impl Into<Value>,
    ) -> Result<(), Error> {
        self.get_mut(id)?.set_value(leaf, value);
        Ok(())
    }

    pub fn value(
        &self,
        id: EntityId,
        leaf: &str,
    ) -> Result<Option<&Value>, Error> {
        self.get(id).map(|entity| entity.value(leaf))
    }

    // Returns the top-level entity the given entity belongs to.
    pub fn top_entity(&self, id: EntityId) -> Result<EntityId, Error> {
        let root = self.ancestors(id).last().unwrap_or(id);
        if self.get(root)?.is_top_level() {
            Ok(root)
        } else {
            Err(Error::UnresolvedAncestor {
                path: self.partial_path(id),
            })
        }
    }

    // Returns the path segment identifying the entity under its parent.
    pub fn segment_path(&self, id: EntityId) -> Result<PathSegment, Error> {
        let entity = self.get(id)?;
        let keys = entity
            .list_keys()
            .iter()
            .map(|key| {
                let Some(value) = entity.value(key) else {
                    return Err(Error::MissingListKey {
                        entity: entity.yang_name().to_owned(),
                        key: key.clone(),
                    });
                };
                // Predicate literals can't escape their quote character.
                let value = value.to_string();
                if value.contains('\'') && value.contains('"') {
                    return Err(Error::UnquotableKey {
                        entity: entity.yang_name().to_owned(),
                        key: key.clone(),
                    });
                }
                Ok((key.clone(), value))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(PathSegment::new(
            entity.module_name().map(str::to_owned),
            entity.yang_name().to_owned(),
            keys,
        ))
    }

    // Walks from the entity up to its top-level ancestor and returns the
    // root-to-node path.
    pub fn schema_path(&self, id: EntityId) -> Result<SchemaPath, Error> {
        self.top_entity(id)?;

        let mut segments = vec![self.segment_path(id)?];
        for ancestor in self.ancestors(id) {
            segments.push(self.segment_path(ancestor)?);
        }
        segments.reverse();

        Ok(SchemaPath::from(segments))
    }

    pub fn absolute_path(&self, id: EntityId) -> Result<String, Error> {
        self.schema_path(id).map(|path| path.to_string())
    }

    // Verifies that every parent link is mirrored by the parent's child
    // collection and vice versa.
    pub fn check_consistency(&self) -> Result<(), Error> {
        for (id, entity) in self.iter() {
            if let Some(parent) = entity.parent {
                let linked = self
                    .arena
                    .get(parent.0)
                    .is_some_and(|p| p.children.contains(&id));
                if !linked {
                    return Err(Error::Inconsistent { child: id, parent });
                }
            }
            for child in &entity.children {
                let linked = self
                    .arena
                    .get(child.0)
                    .is_some_and(|c| c.parent == Some(id));
                if !linked {
                    return Err(Error::Inconsistent {
                        child: *child,
                        parent: id,
                    });
                }
            }
        }

        Ok(())
    }

    // Best-effort path used in error messages, for chains that don't reach
    // a top-level entity.
    fn partial_path(&self, id: EntityId) -> String {
        let mut names = vec![];
        for id in std::iter::once(id).chain(self.ancestors(id)) {
            if let Ok(entity) = self.get(id) {
                names.push(entity.yang_name());
            }
        }
        names.reverse();
        names.join("/")
    }
}

// ===== impl Ancestors =====

impl Iterator for Ancestors<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let id = self.next?;
        self.next = self.tree.arena.get(id.0).and_then(|entity| entity.parent);
        Some(id)
    }
}
