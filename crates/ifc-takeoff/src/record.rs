// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-element records and aggregated report rows

use ifc_takeoff_model::EntityId;
use serde::Serialize;

/// Resolved attributes of one element
///
/// `None` marks an attribute no resolution path could supply.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementRecord {
    /// Originating element
    pub element: EntityId,
    /// Element class (`IfcBeam`, `IfcColumn`, ...)
    pub ifc_type: String,
    /// Nominal size descriptor (e.g., "H-200x100")
    pub size: Option<String>,
    /// Weight figure, in file units
    pub weight: Option<f64>,
    /// Length, in file units
    pub length: Option<f64>,
}

impl ElementRecord {
    /// Create a record with no resolved attributes
    pub fn new(element: EntityId, ifc_type: impl Into<String>) -> Self {
        Self {
            element,
            ifc_type: ifc_type.into(),
            size: None,
            weight: None,
            length: None,
        }
    }

    /// Set the size, builder style
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Set the weight, builder style
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the length, builder style
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }
}

/// One line of the take-off: identical elements merged by `(type, size)`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub ifc_type: String,
    pub size: Option<String>,
    /// Weight of the first element seen with this key
    pub weight: Option<f64>,
    /// Length of the first element seen with this key
    pub length: Option<f64>,
    /// Number of elements merged into this row
    pub quantity: u32,
}

impl AggregatedRow {
    pub(crate) fn first(record: &ElementRecord) -> Self {
        Self {
            ifc_type: record.ifc_type.clone(),
            size: record.size.clone(),
            weight: record.weight,
            length: record.length,
            quantity: 1,
        }
    }

    /// Size as display text, `label` standing in for an unresolved size
    pub fn size_or<'a>(&'a self, label: &'a str) -> &'a str {
        self.size.as_deref().unwrap_or(label)
    }
}

/// Render an optional figure, `label` standing in for a missing one
pub fn figure_or(value: Option<f64>, label: &str) -> String {
    value.map_or_else(|| label.to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_helpers() {
        let record = ElementRecord::new(EntityId(1), "IfcBeam").with_weight(7.85);
        let row = AggregatedRow::first(&record);

        assert_eq!(row.quantity, 1);
        assert_eq!(row.size_or("N/A"), "N/A");
        assert_eq!(figure_or(row.weight, "N/A"), "7.85");
        assert_eq!(figure_or(row.length, "-"), "-");
    }
}
