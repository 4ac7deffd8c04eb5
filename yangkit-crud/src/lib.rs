//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod codec;
pub mod debug;
pub mod error;
pub mod service;

pub use error::Error;
pub use service::{CrudService, TraceOptions};
