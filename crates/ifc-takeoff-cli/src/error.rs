// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI error type

use ifc_takeoff::TakeoffError;
use ifc_takeoff_model::GraphError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Takeoff(#[from] TakeoffError),

    #[error("Failed to load model: {0}")]
    Graph(#[from] GraphError),

    #[error("Failed to parse TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Missing configuration file: {0}")]
    MissingConfig(PathBuf),

    #[error("Failed to write report: {0}")]
    Json(#[from] serde_json::Error),
}
