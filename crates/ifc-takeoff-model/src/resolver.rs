// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up and resolving STEP records

use crate::{AttributeValue, DecodedEntity, EntityId, IfcType};
use std::sync::Arc;

/// Entity lookup and reference resolution
///
/// Graph adapters build on this to walk from an element to its relationship
/// targets. Implementations should provide O(1) lookup by entity ID.
///
/// # Example
///
/// ```ignore
/// use ifc_takeoff_model::{EntityResolver, EntityId};
///
/// fn pset_name(resolver: &dyn EntityResolver, rel: EntityId) -> Option<String> {
///     let rel = resolver.get(rel)?;
///     let pset = resolver.resolve_ref(rel.get(5)?)?;
///     pset.get_string(2).map(str::to_string)
/// }
/// ```
pub trait EntityResolver: Send + Sync {
    /// Get entity by ID
    ///
    /// `None` when the ID is unknown or its record does not decode.
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>>;

    /// Resolve an entity reference from an attribute value
    fn resolve_ref(&self, attr: &AttributeValue) -> Option<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// IDs of all entities of a specific type, in file order
    fn ids_by_type(&self, ifc_type: &IfcType) -> &[EntityId];

    /// Get all entities of a specific type, in file order
    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>> {
        self.ids_by_type(ifc_type)
            .iter()
            .filter_map(|id| self.get(*id))
            .collect()
    }

    /// Total entity count
    fn entity_count(&self) -> usize;
}
