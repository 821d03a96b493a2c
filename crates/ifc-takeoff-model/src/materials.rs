// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Materials and material profile sets

use serde::{Deserialize, Serialize};

/// Mechanical figures attached to a material
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct MechanicalProperties {
    /// Specific gravity / mass density, in file units
    pub specific_gravity: Option<f64>,
}

/// A single material (`IfcMaterial`)
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    /// Material name (e.g., "S355")
    pub name: String,
    /// Mechanical properties, when the model defines any
    pub mechanical: Option<MechanicalProperties>,
}

impl Material {
    /// Create a material without mechanical properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mechanical: None,
        }
    }

    /// Attach a specific gravity figure
    pub fn with_specific_gravity(mut self, value: f64) -> Self {
        self.mechanical = Some(MechanicalProperties {
            specific_gravity: Some(value),
        });
        self
    }

    /// Specific gravity, if the mechanical properties carry one
    pub fn specific_gravity(&self) -> Option<f64> {
        self.mechanical.as_ref()?.specific_gravity
    }
}

/// One entry of a material profile set (`IfcMaterialProfile`)
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialProfile {
    /// Entry name
    pub name: Option<String>,
    /// `ProfileName` of the referenced profile definition
    pub profile_name: Option<String>,
    /// Material of this entry
    pub material: Option<Material>,
}

impl MaterialProfile {
    /// Create an entry whose profile is named `profile_name`
    pub fn named(profile_name: impl Into<String>) -> Self {
        Self {
            name: None,
            profile_name: Some(profile_name.into()),
            material: None,
        }
    }

    /// Attach a material to this entry
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
}

/// Ordered collection of material profiles (`IfcMaterialProfileSet`)
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialProfileSet {
    /// Set name
    pub name: Option<String>,
    /// Profiles in file order
    pub profiles: Vec<MaterialProfile>,
}

impl MaterialProfileSet {
    /// Create a profile set from its entries
    pub fn new(profiles: Vec<MaterialProfile>) -> Self {
        Self {
            name: None,
            profiles,
        }
    }

    /// First profile name in set order
    pub fn first_profile_name(&self) -> Option<&str> {
        self.profiles.iter().find_map(|p| p.profile_name.as_deref())
    }
}
