// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ElementGraph trait implementation over STEP records
//!
//! Relationship records are indexed once at load time; the targets are
//! decoded into [`Association`] values only when an element asks for them.

use crate::resolver::ResolverImpl;
use crate::scanner::parse_header;
use ifc_takeoff_model::{
    Association, AttributeValue, DecodedEntity, Element, ElementEntry, ElementGraph, EntityId,
    EntityResolver, GraphError, GraphLoader, IfcType, Material, MaterialProfile,
    MaterialProfileSet, MechanicalProperties, ModelMetadata, Property, PropertySet, PropertyValue,
    Quantity, QuantityKind, QuantitySet, Result, UnreadableElement,
};
use log::debug;
use rustc_hash::FxHashMap;
use std::sync::Arc;

const PROPERTY_RELATION: &str = "property";
const QUANTITY_RELATION: &str = "quantity";
const MATERIAL_RELATION: &str = "material";

/// Element graph over a parsed STEP file
pub struct StepGraph {
    /// Record lookup
    resolver: Arc<ResolverImpl>,
    /// Element ID -> property definition IDs (anything but IfcElementQuantity)
    pset_index: FxHashMap<u32, Vec<EntityId>>,
    /// Element ID -> IfcElementQuantity IDs
    qset_index: FxHashMap<u32, Vec<EntityId>>,
    /// Element ID -> material select IDs
    material_index: FxHashMap<u32, Vec<EntityId>>,
    /// Material ID -> mass density / specific gravity
    density_index: FxHashMap<u32, f64>,
    /// File metadata
    metadata: ModelMetadata,
}

impl StepGraph {
    /// Parse STEP content and index its relationships
    pub fn parse(content: &str) -> Result<Self> {
        let metadata = parse_header(content)?;
        let resolver = Arc::new(ResolverImpl::new(content.to_string()));

        if resolver.entity_count() == 0 {
            return Err(GraphError::format("DATA section contains no records"));
        }

        let mut graph = Self {
            resolver,
            pset_index: FxHashMap::default(),
            qset_index: FxHashMap::default(),
            material_index: FxHashMap::default(),
            density_index: FxHashMap::default(),
            metadata,
        };
        graph.index_property_relations();
        graph.index_material_relations();
        graph.index_material_densities();

        debug!(
            "Indexed {} records: {} elements with property sets, {} with quantities, {} with materials",
            graph.resolver.entity_count(),
            graph.pset_index.len(),
            graph.qset_index.len(),
            graph.material_index.len()
        );

        Ok(graph)
    }

    /// IFCRELDEFINESBYPROPERTIES: RelatedObjects at 4, RelatingPropertyDefinition at 5
    fn index_property_relations(&mut self) {
        for rel in self.resolver.entities_by_type(&IfcType::IfcRelDefinesByProperties) {
            let (Some(related), Some(definition)) = (rel.get_refs(4), rel.get_ref(5)) else {
                debug!("Skipping relationship {} without targets", rel.id);
                continue;
            };

            // Dangling definitions stay with the property sets, where the
            // first access reports them
            let is_quantity = self
                .resolver
                .get(definition)
                .is_some_and(|d| d.ifc_type == IfcType::IfcElementQuantity);
            let index = if is_quantity {
                &mut self.qset_index
            } else {
                &mut self.pset_index
            };

            for element in related {
                index.entry(element.0).or_default().push(definition);
            }
        }
    }

    /// IFCRELASSOCIATESMATERIAL: RelatedObjects at 4, RelatingMaterial at 5
    fn index_material_relations(&mut self) {
        for rel in self.resolver.entities_by_type(&IfcType::IfcRelAssociatesMaterial) {
            let (Some(related), Some(material)) = (rel.get_refs(4), rel.get_ref(5)) else {
                debug!("Skipping relationship {} without targets", rel.id);
                continue;
            };
            for element in related {
                self.material_index
                    .entry(element.0)
                    .or_default()
                    .push(material);
            }
        }
    }

    /// Density figures from material property records, first one per material
    fn index_material_densities(&mut self) {
        // IFC2x3: IFCGENERALMATERIALPROPERTIES(Material, MolecularWeight, Porosity, MassDensity)
        for props in self
            .resolver
            .entities_by_type(&IfcType::IfcGeneralMaterialProperties)
        {
            if let (Some(material), Some(density)) = (props.get_ref(0), props.get_float(3)) {
                self.density_index.entry(material.0).or_insert(density);
            }
        }

        // IFC4: IFCMATERIALPROPERTIES(Name, Description, Properties, Material)
        for props in self.resolver.entities_by_type(&IfcType::IfcMaterialProperties) {
            let Some(material) = props.get_ref(3) else {
                continue;
            };
            let density = props.get_refs(2).unwrap_or_default().into_iter().find_map(|id| {
                let prop = self.resolver.get(id)?;
                let name = prop.get_string(0)?;
                let is_density = name.eq_ignore_ascii_case("MassDensity")
                    || name.eq_ignore_ascii_case("SpecificGravity");
                if is_density {
                    prop.get_float(2)
                } else {
                    None
                }
            });
            if let Some(density) = density {
                self.density_index.entry(material.0).or_insert(density);
            }
        }
    }

    fn element_from(&self, entity: &DecodedEntity) -> Element {
        let text = |i: usize| {
            entity
                .get_string(i)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Element {
            id: entity.id,
            ifc_type: entity.ifc_type.clone(),
            global_id: text(0),
            name: text(2),
            description: text(3),
            object_type: text(4),
            tag: text(7),
        }
    }

    /// Resolve a relationship target, reporting dangling references against
    /// the element that owns the relationship
    fn target(
        &self,
        element: &Element,
        relation: &'static str,
        id: EntityId,
    ) -> Result<Arc<DecodedEntity>> {
        self.resolver.get(id).ok_or_else(|| {
            let reason = format!("{} is missing or unreadable", id);
            GraphError::malformed(element.id, relation, reason)
        })
    }

    // ========================================================================
    // Property sets
    // ========================================================================

    /// IFCPROPERTYSET(GlobalId, OwnerHistory, Name, Description, HasProperties)
    fn property_set(&self, element: &Element, id: EntityId) -> Result<Option<PropertySet>> {
        let pset = self.target(element, PROPERTY_RELATION, id)?;
        if pset.ifc_type != IfcType::IfcPropertySet {
            debug!("{}: {} is a {}, not a property set", element.id, id, pset.ifc_type);
            return Ok(None);
        }

        let refs = pset.get_refs(4).ok_or_else(|| {
            let reason = format!("{} has no property list", id);
            GraphError::malformed(element.id, PROPERTY_RELATION, reason)
        })?;

        let mut set = PropertySet::new(pset.get_string(2).unwrap_or_default());
        for prop_id in refs {
            let prop = self.target(element, PROPERTY_RELATION, prop_id)?;
            let Some(name) = prop.get_string(0) else {
                return Err(GraphError::malformed(
                    element.id,
                    PROPERTY_RELATION,
                    format!("property {} has no name", prop_id),
                ));
            };

            // Only single values carry a NominalValue (attribute 2)
            let value = match prop.ifc_type {
                IfcType::IfcPropertySingleValue => prop.get(2).and_then(nominal_value),
                _ => None,
            };
            set.properties.push(Property {
                name: name.to_string(),
                value,
            });
        }

        Ok(Some(set))
    }

    // ========================================================================
    // Quantity sets
    // ========================================================================

    /// IFCELEMENTQUANTITY(GlobalId, OwnerHistory, Name, Description, MethodOfMeasurement, Quantities)
    fn quantity_set(&self, element: &Element, id: EntityId) -> Result<QuantitySet> {
        let qset = self.target(element, QUANTITY_RELATION, id)?;
        let refs = qset.get_refs(5).ok_or_else(|| {
            let reason = format!("{} has no quantity list", id);
            GraphError::malformed(element.id, QUANTITY_RELATION, reason)
        })?;

        let mut set = QuantitySet::new(qset.get_string(2).unwrap_or_default());
        for qty_id in refs {
            let qty = self.target(element, QUANTITY_RELATION, qty_id)?;
            let kind = match qty.ifc_type {
                IfcType::IfcQuantityLength => QuantityKind::Length,
                IfcType::IfcQuantityArea => QuantityKind::Area,
                IfcType::IfcQuantityVolume => QuantityKind::Volume,
                IfcType::IfcQuantityCount => QuantityKind::Count,
                IfcType::IfcQuantityWeight => QuantityKind::Weight,
                IfcType::IfcQuantityTime => QuantityKind::Time,
                // Complex quantities have no single value
                _ => continue,
            };
            // Name at 0, value at 3 for every simple quantity
            let Some(value) = qty.get_float(3) else {
                return Err(GraphError::malformed(
                    element.id,
                    QUANTITY_RELATION,
                    format!("quantity {} has no value", qty_id),
                ));
            };
            set.quantities.push(Quantity::new(
                qty.get_string(0).unwrap_or_default(),
                kind,
                value,
            ));
        }

        Ok(set)
    }

    // ========================================================================
    // Materials
    // ========================================================================

    /// IFCMATERIAL(Name, ...)
    fn material(&self, entity: &DecodedEntity) -> Material {
        let mut material = Material::new(entity.get_string(0).unwrap_or_default());
        if let Some(density) = self.density_index.get(&entity.id.0) {
            material.mechanical = Some(MechanicalProperties {
                specific_gravity: Some(*density),
            });
        }
        material
    }

    fn optional_material(&self, id: Option<EntityId>) -> Option<Material> {
        let entity = self.resolver.get(id?)?;
        (entity.ifc_type == IfcType::IfcMaterial).then(|| self.material(&entity))
    }

    /// IFCMATERIALPROFILE(Name, Description, Material, Profile, Priority, Category)
    fn material_profile(&self, entity: &DecodedEntity) -> MaterialProfile {
        // Every IfcProfileDef subtype has ProfileName at 1
        let profile_name = entity
            .get(3)
            .and_then(|attr| self.resolver.resolve_ref(attr))
            .and_then(|profile| profile.get_string(1).map(str::to_string))
            .filter(|name| !name.is_empty());

        MaterialProfile {
            name: entity.get_string(0).map(str::to_string),
            profile_name,
            material: self.optional_material(entity.get_ref(2)),
        }
    }

    /// IFCMATERIALPROFILESET(Name, Description, MaterialProfiles, CompositeProfile)
    fn material_profile_set(
        &self,
        element: &Element,
        entity: &DecodedEntity,
    ) -> Result<MaterialProfileSet> {
        let mut profiles = Vec::new();
        for id in entity.get_refs(2).unwrap_or_default() {
            let profile = self.target(element, MATERIAL_RELATION, id)?;
            profiles.push(self.material_profile(&profile));
        }
        Ok(MaterialProfileSet {
            name: entity.get_string(0).map(str::to_string),
            profiles,
        })
    }

    /// Translate one RelatingMaterial target into associations
    fn material_select(
        &self,
        element: &Element,
        id: EntityId,
        out: &mut Vec<Association>,
    ) -> Result<()> {
        let entity = self.target(element, MATERIAL_RELATION, id)?;
        match entity.ifc_type {
            IfcType::IfcMaterial => out.push(self.material(&entity).into()),
            // IFCMATERIALLIST(Materials)
            IfcType::IfcMaterialList => {
                for material_id in entity.get_refs(0).unwrap_or_default() {
                    let material = self.target(element, MATERIAL_RELATION, material_id)?;
                    out.push(self.material(&material).into());
                }
            }
            IfcType::IfcMaterialProfileSet => {
                out.push(self.material_profile_set(element, &entity)?.into())
            }
            // IFCMATERIALPROFILESETUSAGE(ForProfileSet, CardinalPoint, ReferenceExtent)
            IfcType::IfcMaterialProfileSetUsage => {
                let set_id = entity.get_ref(0).ok_or_else(|| {
                    let reason = format!("{} has no profile set", id);
                    GraphError::malformed(element.id, MATERIAL_RELATION, reason)
                })?;
                let set = self.target(element, MATERIAL_RELATION, set_id)?;
                out.push(self.material_profile_set(element, &set)?.into());
            }
            IfcType::IfcMaterialProfile => {
                let set = MaterialProfileSet::new(vec![self.material_profile(&entity)]);
                out.push(set.into());
            }
            _ => debug!(
                "{}: material select {} ({}) is not used by the take-off",
                element.id, id, entity.ifc_type
            ),
        }
        Ok(())
    }

    fn related<'a>(index: &'a FxHashMap<u32, Vec<EntityId>>, element: &Element) -> &'a [EntityId] {
        index.get(&element.id.0).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Convert a NominalValue into a property value
///
/// Values arrive wrapped in a measure type (`IFCLABEL('x')`,
/// `IFCMASSDENSITYMEASURE(7850.)`, `IFCBOOLEAN(.T.)`).
fn nominal_value(attr: &AttributeValue) -> Option<PropertyValue> {
    match attr {
        AttributeValue::TypedValue(_, args) => args.first().and_then(nominal_value),
        AttributeValue::String(s) => Some(PropertyValue::Text(s.clone())),
        AttributeValue::Float(f) => Some(PropertyValue::Number(*f)),
        AttributeValue::Integer(i) => Some(PropertyValue::Number(*i as f64)),
        AttributeValue::Enum(e) => match e.as_str() {
            "T" | "TRUE" => Some(PropertyValue::Boolean(true)),
            "F" | "FALSE" => Some(PropertyValue::Boolean(false)),
            _ => None,
        },
        _ => None,
    }
}

impl ElementGraph for StepGraph {
    fn entities_of_type(&self, type_name: &str) -> Result<Vec<ElementEntry>> {
        let type_name = type_name.trim();
        if type_name.is_empty() {
            return Err(GraphError::other("empty element type name"));
        }

        // Subtype records are interleaved with the queried class, so merge
        // them back into file order
        let classes = IfcType::parse(type_name).with_subtypes();
        let mut ids: Vec<(usize, EntityId, &IfcType)> = Vec::new();
        for ty in &classes {
            for id in self.resolver.ids_by_type(ty) {
                let offset = self.resolver.offset_of(*id).unwrap_or(usize::MAX);
                ids.push((offset, *id, ty));
            }
        }
        ids.sort_unstable_by_key(|(offset, _, _)| *offset);

        Ok(ids
            .into_iter()
            .map(|(_, id, ty)| match self.resolver.try_get(id) {
                Ok(entity) => Ok(self.element_from(&entity)),
                Err(error) => Err(UnreadableElement {
                    id,
                    ifc_type: ty.clone(),
                    error,
                }),
            })
            .collect())
    }

    fn associations_defining_properties(&self, element: &Element) -> Result<Vec<Association>> {
        let mut out = Vec::new();
        for id in Self::related(&self.pset_index, element) {
            if let Some(set) = self.property_set(element, *id)? {
                out.push(set.into());
            }
        }
        Ok(out)
    }

    fn associations_defining_quantities(&self, element: &Element) -> Result<Vec<Association>> {
        Self::related(&self.qset_index, element)
            .iter()
            .map(|id| self.quantity_set(element, *id).map(Association::from))
            .collect()
    }

    fn material_associations(&self, element: &Element) -> Result<Vec<Association>> {
        let mut out = Vec::new();
        for id in Self::related(&self.material_index, element) {
            self.material_select(element, *id, &mut out)?;
        }
        Ok(out)
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

/// [`GraphLoader`] for STEP physical files
#[derive(Clone, Copy, Debug, Default)]
pub struct StepLoader;

impl StepLoader {
    pub fn new() -> Self {
        Self
    }
}

impl GraphLoader for StepLoader {
    fn load(&self, content: &str) -> Result<Arc<dyn ElementGraph>> {
        Ok(Arc::new(StepGraph::parse(content)?))
    }
}
