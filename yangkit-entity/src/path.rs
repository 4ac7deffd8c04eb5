//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use derive_new::new;
use itertools::Itertools;
use serde::Serialize;

// One step of an instance identifier.
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Serialize)]
pub struct PathSegment {
    pub module: Option<String>,
    pub name: String,
    pub keys: Vec<(String, String)>,
}

// Root-to-node instance identifier, e.g.
// `/openconfig-bgp:bgp/neighbors/neighbor[neighbor-address='10.0.0.1']`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Serialize)]
pub struct SchemaPath(Vec<PathSegment>);

// ===== impl PathSegment =====

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(module) = &self.module {
            write!(f, "{}:", module)?;
        }
        write!(f, "{}", self.name)?;
        for (key, value) in &self.keys {
            write!(f, "[{}={}]", key, quote(value))?;
        }
        Ok(())
    }
}

// ===== impl SchemaPath =====

impl SchemaPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&PathSegment> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }
}

impl From<Vec<PathSegment>> for SchemaPath {
    fn from(segments: Vec<PathSegment>) -> SchemaPath {
        SchemaPath(segments)
    }
}

impl std::fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.0.iter().join("/"))
    }
}

// ===== helper functions =====

// XPath 1.0 literals have no escape sequences, so the quote character must
// not appear inside the value.
fn quote(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{}\"", value)
    } else {
        format!("'{}'", value)
    }
}
