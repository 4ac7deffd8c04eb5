//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

// CRUD operation errors.
#[derive(Debug)]
pub enum Error {
    Entity(yangkit_entity::Error),
    Encode(xml::writer::Error),
    Provider(yangkit_netconf::Error),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::Entity(error) => {
                error.log();
            }
            Error::Encode(error) => {
                warn!(%error, "{}", self);
            }
            Error::Provider(error) => {
                error.log();
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Entity(..) => {
                write!(f, "failed to resolve the target entity")
            }
            Error::Encode(..) => {
                write!(f, "failed to encode the request payload")
            }
            Error::Provider(..) => {
                write!(f, "failed to execute the request")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Entity(error) => Some(error),
            Error::Encode(error) => Some(error),
            Error::Provider(error) => Some(error),
        }
    }
}

impl From<yangkit_entity::Error> for Error {
    fn from(error: yangkit_entity::Error) -> Error {
        Error::Entity(error)
    }
}

impl From<xml::writer::Error> for Error {
    fn from(error: xml::writer::Error) -> Error {
        Error::Encode(error)
    }
}

impl From<yangkit_netconf::Error> for Error {
    fn from(error: yangkit_netconf::Error) -> Error {
        Error::Provider(error)
    }
}
