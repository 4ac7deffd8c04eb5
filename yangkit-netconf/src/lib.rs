//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod debug;
pub mod device;
pub mod dom;
pub mod error;
pub mod framing;
pub mod message;
pub mod session;
pub mod ssh;
#[cfg(feature = "testing")]
pub mod testing;
pub mod transport;

pub use device::DeviceDescriptor;
pub use error::Error;
pub use session::{
    NetconfServiceProvider, ProviderConfig, ServiceProvider, State,
    TraceOptions,
};
