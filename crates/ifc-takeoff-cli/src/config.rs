// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration file loading and command-line overrides

use std::{fs, path::Path};

use log::{debug, info};

use ifc_takeoff::{TakeoffConfig, WeightSource};

use crate::{Args, CliError};

/// Load the run configuration
///
/// An explicit path must exist; without one the defaults are used.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<TakeoffConfig, CliError> {
    let Some(path) = explicit_path else {
        debug!("No configuration file given, using default configuration");
        return Ok(TakeoffConfig::default());
    };

    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading configuration");

    if !path.exists() {
        return Err(CliError::MissingConfig(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply command-line flags on top of the loaded configuration
pub fn apply_overrides(mut config: TakeoffConfig, args: &Args) -> Result<TakeoffConfig, CliError> {
    if !args.element_types.is_empty() {
        config.element_types = args.element_types.clone();
    }
    if let Some(source) = &args.weight_source {
        config.weight_source = source.parse::<WeightSource>()?;
    }
    debug!(config:?; "Effective configuration");
    Ok(config)
}
