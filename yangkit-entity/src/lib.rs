//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod entity;
pub mod error;
pub mod path;
pub mod tree;
pub mod value;

pub use entity::Entity;
pub use error::Error;
pub use path::{PathSegment, SchemaPath};
pub use tree::{EntityId, EntityTree};
pub use value::Value;
