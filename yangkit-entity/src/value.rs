//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

// Scalar value of a YANG leaf.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    // decimal64 values are kept in their canonical lexical form.
    Decimal(String),
    Identity { module: String, name: String },
    Empty,
}

// ===== impl Value =====

impl Value {
    pub fn identity(module: &str, name: &str) -> Value {
        Value::Identity {
            module: module.to_owned(),
            name: name.to_owned(),
        }
    }

    // Returns whether the value has a lexical representation that needs to
    // be written as element content.
    pub fn has_content(&self) -> bool {
        !matches!(self, Value::Empty)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(value) | Value::Decimal(value) => {
                write!(f, "{}", value)
            }
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Uint(value) => write!(f, "{}", value),
            Value::Identity { module, name } => {
                write!(f, "{}:{}", module, name)
            }
            Value::Empty => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<IpAddr> for Value {
    fn from(value: IpAddr) -> Value {
        Value::String(value.to_string())
    }
}

impl From<Ipv4Addr> for Value {
    fn from(value: Ipv4Addr) -> Value {
        Value::String(value.to_string())
    }
}

impl From<Ipv6Addr> for Value {
    fn from(value: Ipv6Addr) -> Value {
        Value::String(value.to_string())
    }
}

macro_rules! value_from_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Value {
                    Value::Uint(value.into())
                }
            }
        )*
    };
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Value {
                    Value::Int(value.into())
                }
            }
        )*
    };
}

value_from_uint!(u8, u16, u32, u64);
value_from_int!(i8, i16, i32, i64);

// ===== unit tests =====
