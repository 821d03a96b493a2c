// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property and quantity sets attached to elements

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal value of a single property
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Label, identifier or text measure
    Text(String),
    /// Any numeric measure
    Number(f64),
    /// Boolean or logical
    Boolean(bool),
}

impl PropertyValue {
    /// Numeric reading of the value
    ///
    /// Text is accepted when it parses as a decimal number in full.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(s) => s.trim().parse().ok(),
            PropertyValue::Boolean(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => f.write_str(s),
            // `{}` on f64 prints the shortest round-trip form (200, 0.5, 1e-7)
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

/// A single named property
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Nominal value, `None` when the file leaves it unset
    pub value: Option<PropertyValue>,
}

impl Property {
    /// Create a property with a value
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create a property without a nominal value
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// A property set containing multiple properties
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertySet {
    /// Property set name (e.g., "Pset_BeamCommon")
    pub name: String,
    /// Properties in file order
    pub properties: Vec<Property>,
}

impl PropertySet {
    /// Create a new property set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a property, builder style
    pub fn with(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Get a property by exact name
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Quantity kinds of `IfcPhysicalSimpleQuantity`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    /// IfcQuantityLength
    Length,
    /// IfcQuantityArea
    Area,
    /// IfcQuantityVolume
    Volume,
    /// IfcQuantityCount
    Count,
    /// IfcQuantityWeight
    Weight,
    /// IfcQuantityTime
    Time,
}

/// A measured quantity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Quantity name (e.g., "Length", "NetWeight")
    pub name: String,
    /// Kind of measure
    pub kind: QuantityKind,
    /// Numeric value in file units
    pub value: f64,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(name: impl Into<String>, kind: QuantityKind, value: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
        }
    }
}

/// A named set of quantities (`IfcElementQuantity`)
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct QuantitySet {
    /// Quantity set name (e.g., "Qto_BeamBaseQuantities")
    pub name: String,
    /// Quantities in file order
    pub quantities: Vec<Quantity>,
}

impl QuantitySet {
    /// Create a new quantity set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantities: Vec::new(),
        }
    }

    /// Add a quantity, builder style
    pub fn with(mut self, quantity: Quantity) -> Self {
        self.quantities.push(quantity);
        self
    }
}
