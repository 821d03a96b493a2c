// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for element graph access

use crate::EntityId;
use thiserror::Error;

/// Result type alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while loading or traversing an element graph
#[derive(Error, Debug)]
pub enum GraphError {
    /// Input is not a STEP physical file
    #[error("Invalid IFC format: {0}")]
    InvalidFormat(String),

    /// Failed to parse header section
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Failed to decode a single record
    #[error("Failed to parse entity {0}: {1}")]
    EntityParse(EntityId, String),

    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// A relationship attached to an element has an unexpected shape
    #[error("Malformed {relation} association on element {element}: {reason}")]
    MalformedAssociation {
        element: EntityId,
        relation: &'static str,
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl GraphError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        GraphError::InvalidFormat(msg.into())
    }

    /// Create a new entity parse error
    pub fn entity_parse(id: EntityId, msg: impl Into<String>) -> Self {
        GraphError::EntityParse(id, msg.into())
    }

    /// Create a malformed association error
    pub fn malformed(element: EntityId, relation: &'static str, reason: impl Into<String>) -> Self {
        GraphError::MalformedAssociation {
            element,
            relation,
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        GraphError::Other(msg.into())
    }
}
