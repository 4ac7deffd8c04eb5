//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use yangkit_entity::{EntityId, EntityTree};
use yangkit_netconf::ServiceProvider;
use yangkit_netconf::error::ProtocolError;
use yangkit_netconf::message::{EditOperation, Request};

use crate::codec;
use crate::debug::Debug;
use crate::error::Error;

// CRUD service trace options.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TraceOptions {
    pub requests: bool,
}

// Translates operations on entity tree nodes into NETCONF requests.
//
// The service holds no session state. Each call runs exactly one
// request/reply cycle on the given provider and never modifies the tree.
#[derive(Debug, Default)]
pub struct CrudService {
    trace_opts: TraceOptions,
}

// ===== impl CrudService =====

impl CrudService {
    pub fn new(trace_opts: TraceOptions) -> CrudService {
        CrudService { trace_opts }
    }

    // Deletes the configuration of the target node on the device.
    //
    // Returns `false` when the device rejects the request, e.g. because the
    // data doesn't exist. Errors are returned when the request couldn't be
    // built or the session failed.
    pub fn delete<P>(
        &self,
        provider: &mut P,
        tree: &EntityTree,
        target: EntityId,
    ) -> Result<bool, Error>
    where
        P: ServiceProvider + ?Sized,
    {
        self.edit(provider, tree, target, EditOperation::Delete)
    }

    fn edit<P>(
        &self,
        provider: &mut P,
        tree: &EntityTree,
        target: EntityId,
        operation: EditOperation,
    ) -> Result<bool, Error>
    where
        P: ServiceProvider + ?Sized,
    {
        let path = tree.schema_path(target)?;
        if !provider.is_connected() {
            return Err(Error::Provider(ProtocolError::NotConnected.into()));
        }

        let payload = codec::encode_operation(tree, target, operation)?;
        if self.trace_opts.requests {
            Debug::RequestTx(operation, &path, &payload).log();
        }

        let request = Request::edit_config(path.to_string(), payload);
        match provider.execute(request) {
            Ok(_) => {
                if self.trace_opts.requests {
                    Debug::RequestAccepted(operation, &path).log();
                }
                Ok(true)
            }
            Err(yangkit_netconf::Error::Remote(error)) => {
                error.log();
                if self.trace_opts.requests {
                    Debug::RequestRejected(operation, &path).log();
                }
                Ok(false)
            }
            Err(error) => Err(Error::Provider(error)),
        }
    }
}
