// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Size, weight and length resolution for a single element
//!
//! Graph access happens once, in [`ElementAssociations::load`]. The cascades
//! themselves only look at loaded data and never fail: a path that yields
//! nothing falls through to the next one, and the last step is `None`.

use crate::config::{TakeoffConfig, WeightSource};
use crate::record::ElementRecord;
use ifc_takeoff_model::{
    Association, Element, ElementGraph, Material, MaterialProfileSet, PropertySet, QuantityKind,
    QuantitySet,
};

/// Property name fragments that mark a size descriptor
const SIZE_KEYWORDS: [&str; 3] = ["section", "profile", "size"];

/// Property names that carry a weight figure
const WEIGHT_NAMES: [&str; 2] = ["weight", "mass"];

/// Everything attached to one element, in relationship order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementAssociations {
    pub properties: Vec<Association>,
    pub quantities: Vec<Association>,
    pub materials: Vec<Association>,
}

impl ElementAssociations {
    /// Read all three association lists of `element`
    ///
    /// Fails as soon as one accessor fails; the caller decides what happens
    /// to the element.
    pub fn load(
        graph: &dyn ElementGraph,
        element: &Element,
    ) -> ifc_takeoff_model::Result<Self> {
        Ok(Self {
            properties: graph.associations_defining_properties(element)?,
            quantities: graph.associations_defining_quantities(element)?,
            materials: graph.material_associations(element)?,
        })
    }

    fn all(&self) -> impl Iterator<Item = &Association> {
        self.properties
            .iter()
            .chain(&self.quantities)
            .chain(&self.materials)
    }

    fn property_sets(&self) -> impl Iterator<Item = &PropertySet> {
        self.all().filter_map(|assoc| match assoc {
            Association::PropertySet(pset) => Some(pset),
            _ => None,
        })
    }

    fn quantity_sets(&self) -> impl Iterator<Item = &QuantitySet> {
        self.all().filter_map(|assoc| match assoc {
            Association::QuantitySet(qset) => Some(qset),
            _ => None,
        })
    }

    fn material_selects(&self) -> impl Iterator<Item = &Association> {
        self.all().filter(|assoc| match assoc {
            Association::Material(_) | Association::MaterialProfileSet(_) => true,
            Association::PropertySet(_) | Association::QuantitySet(_) => false,
        })
    }
}

/// Resolves the three take-off attributes of an element
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyResolver {
    size_from_description: bool,
    weight_source: WeightSource,
}

impl PropertyResolver {
    pub fn new(config: &TakeoffConfig) -> Self {
        Self {
            size_from_description: config.size_from_description,
            weight_source: config.weight_source,
        }
    }

    /// Build the record for `element`
    pub fn resolve(&self, element: &Element, assoc: &ElementAssociations) -> ElementRecord {
        ElementRecord {
            element: element.id,
            ifc_type: element.ifc_type.name().to_string(),
            size: self.resolve_size(element, assoc),
            weight: self.resolve_weight(assoc),
            length: self.resolve_length(assoc),
        }
    }

    /// Nominal size descriptor
    ///
    /// Description (when enabled), then size-like properties, then the
    /// first material profile name.
    pub fn resolve_size(&self, element: &Element, assoc: &ElementAssociations) -> Option<String> {
        if self.size_from_description {
            if let Some(description) = element.description.as_deref().filter(|d| !d.is_empty()) {
                return Some(description.to_string());
            }
        }

        size_from_properties(assoc).or_else(|| size_from_profiles(assoc))
    }

    /// Weight figure, from the configured source only
    pub fn resolve_weight(&self, assoc: &ElementAssociations) -> Option<f64> {
        match self.weight_source {
            WeightSource::Material => weight_from_materials(assoc),
            WeightSource::Property => weight_from_properties(assoc),
        }
    }

    /// First length quantity
    pub fn resolve_length(&self, assoc: &ElementAssociations) -> Option<f64> {
        assoc
            .quantity_sets()
            .flat_map(|qset| &qset.quantities)
            .find(|q| q.kind == QuantityKind::Length)
            .map(|q| q.value)
    }
}

fn is_size_name(name: &str) -> bool {
    let name = name.to_lowercase();
    SIZE_KEYWORDS.iter().any(|k| name.contains(k))
}

fn size_from_properties(assoc: &ElementAssociations) -> Option<String> {
    assoc
        .property_sets()
        .flat_map(|pset| &pset.properties)
        .filter(|p| is_size_name(&p.name))
        .filter_map(|p| p.value.as_ref())
        .map(|v| v.to_string())
        .find(|s| !s.trim().is_empty())
}

fn size_from_profiles(assoc: &ElementAssociations) -> Option<String> {
    assoc.material_selects().find_map(|select| match select {
        Association::MaterialProfileSet(set) => set.first_profile_name().map(str::to_string),
        _ => None,
    })
}

fn profile_set_gravity(set: &MaterialProfileSet) -> Option<f64> {
    set.profiles
        .iter()
        .find_map(|p| p.material.as_ref().and_then(Material::specific_gravity))
}

fn weight_from_materials(assoc: &ElementAssociations) -> Option<f64> {
    assoc.material_selects().find_map(|select| match select {
        Association::Material(material) => material.specific_gravity(),
        Association::MaterialProfileSet(set) => profile_set_gravity(set),
        _ => None,
    })
}

fn weight_from_properties(assoc: &ElementAssociations) -> Option<f64> {
    assoc
        .property_sets()
        .flat_map(|pset| &pset.properties)
        .find(|p| {
            p.value.is_some() && WEIGHT_NAMES.iter().any(|n| p.name.eq_ignore_ascii_case(n))
        })
        .and_then(|p| p.value.as_ref())
        .and_then(|v| v.as_number())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_takeoff_model::{
        EntityId, IfcType, MaterialProfile, Property, PropertyValue, Quantity,
    };

    fn beam() -> Element {
        Element::new(EntityId(1), IfcType::IfcBeam)
    }

    fn pset(props: Vec<Property>) -> Association {
        let mut set = PropertySet::new("Pset");
        set.properties = props;
        set.into()
    }

    fn profile_set(name: &str, gravity: Option<f64>) -> Association {
        let mut profile = MaterialProfile::named(name);
        if let Some(g) = gravity {
            profile = profile.with_material(Material::new("SS400").with_specific_gravity(g));
        }
        MaterialProfileSet::new(vec![profile]).into()
    }

    fn material_resolver() -> PropertyResolver {
        PropertyResolver::new(&TakeoffConfig::default())
    }

    fn property_resolver() -> PropertyResolver {
        let config = TakeoffConfig::default().with_weight_source(WeightSource::Property);
        PropertyResolver::new(&config)
    }

    #[test]
    fn test_no_associations_resolves_nothing() {
        let record = material_resolver().resolve(&beam(), &ElementAssociations::default());
        assert_eq!(record.ifc_type, "IfcBeam");
        assert_eq!(record.size, None);
        assert_eq!(record.weight, None);
        assert_eq!(record.length, None);

        let record = property_resolver().resolve(&beam(), &ElementAssociations::default());
        assert_eq!(record.weight, None);
    }

    #[test]
    fn test_size_property_beats_material_profile() {
        let assoc = ElementAssociations {
            properties: vec![pset(vec![Property::new("Profile", "H-200x100")])],
            materials: vec![profile_set("H-300x150", None)],
            ..Default::default()
        };
        assert_eq!(
            material_resolver().resolve_size(&beam(), &assoc).as_deref(),
            Some("H-200x100")
        );
    }

    #[test]
    fn test_size_name_match_is_case_insensitive_substring() {
        let assoc = ElementAssociations {
            properties: vec![pset(vec![
                Property::new("Name", "B1"),
                Property::empty("SECTION"),
                Property::new("CrossSectionName", "L-65x65x6"),
                Property::new("Size", "ignored"),
            ])],
            ..Default::default()
        };
        assert_eq!(
            material_resolver().resolve_size(&beam(), &assoc).as_deref(),
            Some("L-65x65x6")
        );
    }

    #[test]
    fn test_numeric_size_renders_shortest_form() {
        let assoc = ElementAssociations {
            properties: vec![pset(vec![Property::new("Size", 200.0)])],
            ..Default::default()
        };
        assert_eq!(
            material_resolver().resolve_size(&beam(), &assoc).as_deref(),
            Some("200")
        );
    }

    #[test]
    fn test_size_falls_back_to_material_profile() {
        let assoc = ElementAssociations {
            properties: vec![pset(vec![Property::new("Name", "B1")])],
            materials: vec![
                Material::new("SS400").into(),
                profile_set("H-300x150", None),
            ],
            ..Default::default()
        };
        assert_eq!(
            material_resolver().resolve_size(&beam(), &assoc).as_deref(),
            Some("H-300x150")
        );
    }

    fn unnamed_profile() -> MaterialProfile {
        MaterialProfile {
            name: Some("P0".into()),
            profile_name: None,
            material: None,
        }
    }

    #[test]
    fn test_unnamed_profile_is_passed_over() {
        let set = MaterialProfileSet::new(vec![
            unnamed_profile(),
            MaterialProfile::named("H-250x125"),
            MaterialProfile::named("H-300x150"),
        ]);
        let assoc = ElementAssociations {
            materials: vec![set.into()],
            ..Default::default()
        };
        assert_eq!(
            material_resolver().resolve_size(&beam(), &assoc).as_deref(),
            Some("H-250x125")
        );
    }

    #[test]
    fn test_profile_set_without_names_falls_through_to_next_set() {
        let assoc = ElementAssociations {
            materials: vec![
                MaterialProfileSet::new(vec![unnamed_profile(), unnamed_profile()]).into(),
                MaterialProfileSet::new(Vec::new()).into(),
                profile_set("L-65x65x6", None),
                profile_set("H-300x150", None),
            ],
            ..Default::default()
        };
        assert_eq!(
            material_resolver().resolve_size(&beam(), &assoc).as_deref(),
            Some("L-65x65x6")
        );
    }

    #[test]
    fn test_blank_size_property_falls_through() {
        let assoc = ElementAssociations {
            properties: vec![pset(vec![
                Property::new("Profile", "   "),
                Property::new("SectionName", "H-200x100"),
            ])],
            ..Default::default()
        };
        assert_eq!(
            material_resolver().resolve_size(&beam(), &assoc).as_deref(),
            Some("H-200x100")
        );
    }

    #[test]
    fn test_description_first_only_when_enabled() {
        let element = beam().with_description("H-400x200");
        let assoc = ElementAssociations {
            properties: vec![pset(vec![Property::new("Profile", "H-200x100")])],
            ..Default::default()
        };

        assert_eq!(
            material_resolver().resolve_size(&element, &assoc).as_deref(),
            Some("H-200x100")
        );

        let config = TakeoffConfig {
            size_from_description: true,
            ..Default::default()
        };
        let resolver = PropertyResolver::new(&config);
        assert_eq!(
            resolver.resolve_size(&element, &assoc).as_deref(),
            Some("H-400x200")
        );

        // An empty description does not count
        let blank = beam().with_description("");
        assert_eq!(
            resolver.resolve_size(&blank, &assoc).as_deref(),
            Some("H-200x100")
        );
    }

    #[test]
    fn test_weight_from_material() {
        let assoc = ElementAssociations {
            materials: vec![
                Material::new("Paint").into(),
                Material::new("SS400").with_specific_gravity(7.85).into(),
            ],
            ..Default::default()
        };
        assert_eq!(material_resolver().resolve_weight(&assoc), Some(7.85));

        let assoc = ElementAssociations {
            materials: vec![profile_set("H-200x100", Some(7.85))],
            ..Default::default()
        };
        assert_eq!(material_resolver().resolve_weight(&assoc), Some(7.85));
    }

    #[test]
    fn test_weight_source_is_exclusive() {
        let assoc = ElementAssociations {
            properties: vec![pset(vec![Property::new("Weight", 42.5)])],
            materials: vec![Material::new("SS400").with_specific_gravity(7.85).into()],
            ..Default::default()
        };
        assert_eq!(material_resolver().resolve_weight(&assoc), Some(7.85));
        assert_eq!(property_resolver().resolve_weight(&assoc), Some(42.5));
    }

    #[test]
    fn test_weight_property_name_must_match_exactly() {
        let assoc = ElementAssociations {
            properties: vec![pset(vec![
                Property::new("NetWeight", 10.0),
                Property::empty("mass"),
                Property::new("MASS", PropertyValue::Text(" 12.5 ".into())),
            ])],
            ..Default::default()
        };
        assert_eq!(property_resolver().resolve_weight(&assoc), Some(12.5));

        let assoc = ElementAssociations {
            properties: vec![pset(vec![Property::new("weight", "heavy")])],
            ..Default::default()
        };
        assert_eq!(property_resolver().resolve_weight(&assoc), None);
    }

    #[test]
    fn test_length_is_first_length_quantity() {
        let qset = QuantitySet::new("BaseQuantities")
            .with(Quantity::new("NetWeight", QuantityKind::Weight, 120.0))
            .with(Quantity::new("Length", QuantityKind::Length, 6000.0))
            .with(Quantity::new("Length", QuantityKind::Length, 5000.0));
        let assoc = ElementAssociations {
            quantities: vec![qset.into()],
            ..Default::default()
        };
        assert_eq!(material_resolver().resolve_length(&assoc), Some(6000.0));
    }
}
