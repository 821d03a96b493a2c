// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Elements and the associations attached to them

use crate::{
    EntityId, GraphError, IfcType, Material, MaterialProfileSet, PropertySet, QuantitySet,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structural entity read from the model graph
///
/// Only the direct attributes the take-off reads are copied out of the
/// record; relationships are reached through
/// [`ElementGraph`](crate::ElementGraph).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Entity ID
    pub id: EntityId,
    /// Entity class
    pub ifc_type: IfcType,
    /// GlobalId (attribute 0)
    pub global_id: Option<String>,
    /// Name (attribute 2)
    pub name: Option<String>,
    /// Description (attribute 3)
    pub description: Option<String>,
    /// ObjectType (attribute 4)
    pub object_type: Option<String>,
    /// Tag (attribute 7)
    pub tag: Option<String>,
}

impl Element {
    /// Create an element with no direct attributes
    pub fn new(id: EntityId, ifc_type: IfcType) -> Self {
        Self {
            id,
            ifc_type,
            global_id: None,
            name: None,
            description: None,
            object_type: None,
            tag: None,
        }
    }

    /// Set the description, builder style
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An element record of a queried class that could not be decoded
#[derive(Debug)]
pub struct UnreadableElement {
    pub id: EntityId,
    pub ifc_type: IfcType,
    pub error: GraphError,
}

impl fmt::Display for UnreadableElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.ifc_type, self.error)
    }
}

/// One result of an element query: the element, or why its record was unreadable
pub type ElementEntry = std::result::Result<Element, UnreadableElement>;

/// What a relationship attached to an element resolves to
///
/// Closed set: graph adapters translate whatever their backend offers into
/// one of these, and consumers match on it exhaustively.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Association {
    /// `IfcPropertySet` through `IfcRelDefinesByProperties`
    PropertySet(PropertySet),
    /// `IfcElementQuantity` through `IfcRelDefinesByProperties`
    QuantitySet(QuantitySet),
    /// `IfcMaterial` through `IfcRelAssociatesMaterial`
    Material(Material),
    /// `IfcMaterialProfileSet` (or its usage) through `IfcRelAssociatesMaterial`
    MaterialProfileSet(MaterialProfileSet),
}

impl Association {
    /// Short kind name, for logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Association::PropertySet(_) => "property set",
            Association::QuantitySet(_) => "quantity set",
            Association::Material(_) => "material",
            Association::MaterialProfileSet(_) => "material profile set",
        }
    }
}

impl From<PropertySet> for Association {
    fn from(pset: PropertySet) -> Self {
        Association::PropertySet(pset)
    }
}

impl From<QuantitySet> for Association {
    fn from(qset: QuantitySet) -> Self {
        Association::QuantitySet(qset)
    }
}

impl From<Material> for Association {
    fn from(material: Material) -> Self {
        Association::Material(material)
    }
}

impl From<MaterialProfileSet> for Association {
    fn from(set: MaterialProfileSet) -> Self {
        Association::MaterialProfileSet(set)
    }
}
