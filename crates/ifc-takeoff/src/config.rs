// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration

use crate::{Result, TakeoffError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where element weights are read from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightSource {
    /// Specific gravity of the associated material
    #[default]
    Material,
    /// A property named `weight` or `mass`
    Property,
}

impl FromStr for WeightSource {
    type Err = TakeoffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "material" => Ok(WeightSource::Material),
            "property" => Ok(WeightSource::Property),
            other => Err(TakeoffError::config(format!(
                "unknown weight source '{other}' (expected 'material' or 'property')"
            ))),
        }
    }
}

impl fmt::Display for WeightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightSource::Material => f.write_str("material"),
            WeightSource::Property => f.write_str("property"),
        }
    }
}

/// Settings for one take-off run
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```toml
/// element_types = ["IfcBeam", "IfcColumn", "IfcMember"]
/// weight_source = "property"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TakeoffConfig {
    /// Element classes to collect, in report order
    pub element_types: Vec<String>,
    /// Use a non-empty element description as the size before any
    /// property set is consulted
    pub size_from_description: bool,
    /// Weight strategy, applied to every element of the run
    pub weight_source: WeightSource,
    /// Text shown in place of an unresolved attribute
    pub undefined_label: String,
}

impl Default for TakeoffConfig {
    fn default() -> Self {
        Self {
            element_types: vec!["IfcBeam".to_string(), "IfcColumn".to_string()],
            size_from_description: false,
            weight_source: WeightSource::Material,
            undefined_label: "N/A".to_string(),
        }
    }
}

impl TakeoffConfig {
    /// Replace the element classes, builder style
    pub fn with_element_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.element_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the weight strategy, builder style
    pub fn with_weight_source(mut self, source: WeightSource) -> Self {
        self.weight_source = source;
        self
    }

    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.element_types.is_empty() {
            return Err(TakeoffError::config("no element types to collect"));
        }
        if self.element_types.iter().any(|t| t.trim().is_empty()) {
            return Err(TakeoffError::config("element type names must not be blank"));
        }
        Ok(())
    }
}
