//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

use crate::tree::EntityId;

// Entity tree errors.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    EntityNotFound(EntityId),
    ParentIsTopLevel(EntityId),
    ParentCycle(EntityId, EntityId),
    UnresolvedAncestor { path: String },
    MissingListKey { entity: String, key: String },
    UnquotableKey { entity: String, key: String },
    Inconsistent { child: EntityId, parent: EntityId },
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::EntityNotFound(id) | Error::ParentIsTopLevel(id) => {
                warn!(%id, "{}", self);
            }
            Error::ParentCycle(child, parent)
            | Error::Inconsistent { child, parent } => {
                warn!(%child, %parent, "{}", self);
            }
            Error::UnresolvedAncestor { path } => {
                warn!(%path, "{}", self);
            }
            Error::MissingListKey { entity, key }
            | Error::UnquotableKey { entity, key } => {
                warn!(%entity, %key, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EntityNotFound(id) => {
                write!(f, "entity {} not found", id)
            }
            Error::ParentIsTopLevel(..) => {
                write!(f, "top-level entities can't have a parent")
            }
            Error::ParentCycle(..) => {
                write!(f, "entity can't be its own ancestor")
            }
            Error::UnresolvedAncestor { path } => {
                write!(
                    f,
                    "entity '{}' isn't linked to a top-level entity",
                    path
                )
            }
            Error::MissingListKey { entity, key } => {
                write!(f, "list entry '{}' is missing key '{}'", entity, key)
            }
            Error::UnquotableKey { entity, key } => {
                write!(
                    f,
                    "key '{}' of list entry '{}' mixes both quote characters",
                    key, entity
                )
            }
            Error::Inconsistent { .. } => {
                write!(f, "parent and child links disagree")
            }
        }
    }
}

impl std::error::Error for Error {}
