// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for take-off runs

use ifc_takeoff_model::GraphError;
use thiserror::Error;

/// Result type alias for take-off operations
pub type Result<T> = std::result::Result<T, TakeoffError>;

/// Failures that abort a whole take-off run
///
/// Problems with a single element never surface here; they are reported
/// through a [`DiagnosticsSink`](crate::DiagnosticsSink) instead.
#[derive(Error, Debug)]
pub enum TakeoffError {
    /// The graph could not be loaded or queried
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The run configuration is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TakeoffError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        TakeoffError::Config(msg.into())
    }
}
