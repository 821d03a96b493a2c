// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFC data representation
//!
//! Entity identifiers, the entity classes the take-off cares about, and the
//! decoded attribute values of a STEP record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the raw STEP instance name (e.g., #123 becomes EntityId(123))
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

macro_rules! ifc_types {
    ($($(#[$group:meta])* $variant:ident => $step:literal,)*) => {
        /// IFC entity classes known to the take-off
        ///
        /// Anything else is kept verbatim in [`IfcType::Unknown`] so that an
        /// unfamiliar class still compares and groups by its STEP name.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum IfcType {
            $($(#[$group])* $variant,)*
            /// Class not listed above (upper-case STEP name)
            Unknown(String),
        }

        impl IfcType {
            /// Parse a STEP type name (case-insensitive)
            pub fn parse(s: &str) -> Self {
                match s.to_ascii_uppercase().as_str() {
                    $($step => IfcType::$variant,)*
                    _ => IfcType::Unknown(s.to_ascii_uppercase()),
                }
            }

            /// Upper-case name as written in a STEP file (`IFCBEAM`)
            pub fn step_name(&self) -> &str {
                match self {
                    $(IfcType::$variant => $step,)*
                    IfcType::Unknown(s) => s,
                }
            }

            /// Schema spelling of the class (`IfcBeam`)
            ///
            /// Unknown classes fall back to their STEP name.
            pub fn name(&self) -> &str {
                match self {
                    $(IfcType::$variant => stringify!($variant),)*
                    IfcType::Unknown(s) => s,
                }
            }
        }
    };
}

ifc_types! {
    // Abstract supertypes, only meaningful as queries
    IfcElement => "IFCELEMENT",
    IfcBuildingElement => "IFCBUILDINGELEMENT",
    IfcBuiltElement => "IFCBUILTELEMENT",
    IfcBuildingElementComponent => "IFCBUILDINGELEMENTCOMPONENT",
    IfcElementComponent => "IFCELEMENTCOMPONENT",
    IfcReinforcingElement => "IFCREINFORCINGELEMENT",

    // Structural and building elements
    IfcBeam => "IFCBEAM",
    IfcBeamStandardCase => "IFCBEAMSTANDARDCASE",
    IfcColumn => "IFCCOLUMN",
    IfcColumnStandardCase => "IFCCOLUMNSTANDARDCASE",
    IfcMember => "IFCMEMBER",
    IfcMemberStandardCase => "IFCMEMBERSTANDARDCASE",
    IfcPlate => "IFCPLATE",
    IfcPlateStandardCase => "IFCPLATESTANDARDCASE",
    IfcWall => "IFCWALL",
    IfcWallStandardCase => "IFCWALLSTANDARDCASE",
    IfcWallElementedCase => "IFCWALLELEMENTEDCASE",
    IfcCurtainWall => "IFCCURTAINWALL",
    IfcSlab => "IFCSLAB",
    IfcSlabStandardCase => "IFCSLABSTANDARDCASE",
    IfcSlabElementedCase => "IFCSLABELEMENTEDCASE",
    IfcRoof => "IFCROOF",
    IfcDoor => "IFCDOOR",
    IfcDoorStandardCase => "IFCDOORSTANDARDCASE",
    IfcWindow => "IFCWINDOW",
    IfcWindowStandardCase => "IFCWINDOWSTANDARDCASE",
    IfcStair => "IFCSTAIR",
    IfcStairFlight => "IFCSTAIRFLIGHT",
    IfcRamp => "IFCRAMP",
    IfcRampFlight => "IFCRAMPFLIGHT",
    IfcRailing => "IFCRAILING",
    IfcCovering => "IFCCOVERING",
    IfcChimney => "IFCCHIMNEY",
    IfcShadingDevice => "IFCSHADINGDEVICE",
    IfcFooting => "IFCFOOTING",
    IfcPile => "IFCPILE",
    IfcBuildingElementPart => "IFCBUILDINGELEMENTPART",
    IfcReinforcingBar => "IFCREINFORCINGBAR",
    IfcReinforcingMesh => "IFCREINFORCINGMESH",
    IfcTendon => "IFCTENDON",
    IfcTendonAnchor => "IFCTENDONANCHOR",
    IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",

    // Other elements
    IfcDiscreteAccessory => "IFCDISCRETEACCESSORY",
    IfcFastener => "IFCFASTENER",
    IfcMechanicalFastener => "IFCMECHANICALFASTENER",
    IfcElementAssembly => "IFCELEMENTASSEMBLY",
    IfcFurnishingElement => "IFCFURNISHINGELEMENT",
    IfcTransportElement => "IFCTRANSPORTELEMENT",
    IfcOpeningElement => "IFCOPENINGELEMENT",
    IfcOpeningStandardCase => "IFCOPENINGSTANDARDCASE",
    IfcVirtualElement => "IFCVIRTUALELEMENT",
    IfcFlowSegment => "IFCFLOWSEGMENT",
    IfcFlowFitting => "IFCFLOWFITTING",
    IfcFlowTerminal => "IFCFLOWTERMINAL",
    IfcGeographicElement => "IFCGEOGRAPHICELEMENT",
    IfcCivilElement => "IFCCIVILELEMENT",

    // Relationships
    IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
    IfcRelAssociatesMaterial => "IFCRELASSOCIATESMATERIAL",

    // Property and quantity definitions
    IfcPropertySet => "IFCPROPERTYSET",
    IfcPropertySingleValue => "IFCPROPERTYSINGLEVALUE",
    IfcElementQuantity => "IFCELEMENTQUANTITY",
    IfcQuantityLength => "IFCQUANTITYLENGTH",
    IfcQuantityArea => "IFCQUANTITYAREA",
    IfcQuantityVolume => "IFCQUANTITYVOLUME",
    IfcQuantityCount => "IFCQUANTITYCOUNT",
    IfcQuantityWeight => "IFCQUANTITYWEIGHT",
    IfcQuantityTime => "IFCQUANTITYTIME",

    // Materials
    IfcMaterial => "IFCMATERIAL",
    IfcMaterialList => "IFCMATERIALLIST",
    IfcMaterialProfile => "IFCMATERIALPROFILE",
    IfcMaterialProfileSet => "IFCMATERIALPROFILESET",
    IfcMaterialProfileSetUsage => "IFCMATERIALPROFILESETUSAGE",
    IfcMaterialProperties => "IFCMATERIALPROPERTIES",
    IfcGeneralMaterialProperties => "IFCGENERALMATERIALPROPERTIES",
}

/// Instantiable reinforcing classes
const REINFORCING_ELEMENTS: &[IfcType] = &[
    IfcType::IfcReinforcingBar,
    IfcType::IfcReinforcingMesh,
    IfcType::IfcTendon,
    IfcType::IfcTendonAnchor,
];

/// Instantiable building element classes, IFC2x3 and IFC4 combined
///
/// IFC2x3 files put parts and reinforcement under `IfcBuildingElement`
/// (through `IfcBuildingElementComponent`), so they are listed here too.
const BUILDING_ELEMENTS: &[IfcType] = &[
    IfcType::IfcBeam,
    IfcType::IfcBeamStandardCase,
    IfcType::IfcColumn,
    IfcType::IfcColumnStandardCase,
    IfcType::IfcMember,
    IfcType::IfcMemberStandardCase,
    IfcType::IfcPlate,
    IfcType::IfcPlateStandardCase,
    IfcType::IfcWall,
    IfcType::IfcWallStandardCase,
    IfcType::IfcWallElementedCase,
    IfcType::IfcCurtainWall,
    IfcType::IfcSlab,
    IfcType::IfcSlabStandardCase,
    IfcType::IfcSlabElementedCase,
    IfcType::IfcRoof,
    IfcType::IfcDoor,
    IfcType::IfcDoorStandardCase,
    IfcType::IfcWindow,
    IfcType::IfcWindowStandardCase,
    IfcType::IfcStair,
    IfcType::IfcStairFlight,
    IfcType::IfcRamp,
    IfcType::IfcRampFlight,
    IfcType::IfcRailing,
    IfcType::IfcCovering,
    IfcType::IfcChimney,
    IfcType::IfcShadingDevice,
    IfcType::IfcFooting,
    IfcType::IfcPile,
    IfcType::IfcBuildingElementPart,
    IfcType::IfcReinforcingBar,
    IfcType::IfcReinforcingMesh,
    IfcType::IfcTendon,
    IfcType::IfcTendonAnchor,
    IfcType::IfcBuildingElementProxy,
];

/// Instantiable element components (IFC4 `IfcElementComponent`)
const ELEMENT_COMPONENTS: &[IfcType] = &[
    IfcType::IfcBuildingElementPart,
    IfcType::IfcReinforcingBar,
    IfcType::IfcReinforcingMesh,
    IfcType::IfcTendon,
    IfcType::IfcTendonAnchor,
    IfcType::IfcDiscreteAccessory,
    IfcType::IfcFastener,
    IfcType::IfcMechanicalFastener,
];

/// `IfcElement` subtypes that are not building elements
const OTHER_ELEMENTS: &[IfcType] = &[
    IfcType::IfcDiscreteAccessory,
    IfcType::IfcFastener,
    IfcType::IfcMechanicalFastener,
    IfcType::IfcElementAssembly,
    IfcType::IfcFurnishingElement,
    IfcType::IfcTransportElement,
    IfcType::IfcOpeningElement,
    IfcType::IfcOpeningStandardCase,
    IfcType::IfcVirtualElement,
    IfcType::IfcFlowSegment,
    IfcType::IfcFlowFitting,
    IfcType::IfcFlowTerminal,
    IfcType::IfcGeographicElement,
    IfcType::IfcCivilElement,
];

/// Supertype -> instantiable classes a query for it returns
///
/// Classes missing from the table have no known subtypes.
const SUBTYPES: &[(IfcType, &[IfcType])] = &[
    (IfcType::IfcBeam, &[IfcType::IfcBeam, IfcType::IfcBeamStandardCase]),
    (IfcType::IfcColumn, &[IfcType::IfcColumn, IfcType::IfcColumnStandardCase]),
    (IfcType::IfcMember, &[IfcType::IfcMember, IfcType::IfcMemberStandardCase]),
    (IfcType::IfcPlate, &[IfcType::IfcPlate, IfcType::IfcPlateStandardCase]),
    (
        IfcType::IfcWall,
        &[
            IfcType::IfcWall,
            IfcType::IfcWallStandardCase,
            IfcType::IfcWallElementedCase,
        ],
    ),
    (
        IfcType::IfcSlab,
        &[
            IfcType::IfcSlab,
            IfcType::IfcSlabStandardCase,
            IfcType::IfcSlabElementedCase,
        ],
    ),
    (IfcType::IfcDoor, &[IfcType::IfcDoor, IfcType::IfcDoorStandardCase]),
    (IfcType::IfcWindow, &[IfcType::IfcWindow, IfcType::IfcWindowStandardCase]),
    (
        IfcType::IfcOpeningElement,
        &[IfcType::IfcOpeningElement, IfcType::IfcOpeningStandardCase],
    ),
    (IfcType::IfcReinforcingElement, REINFORCING_ELEMENTS),
    (
        IfcType::IfcBuildingElementComponent,
        &[
            IfcType::IfcBuildingElementPart,
            IfcType::IfcReinforcingBar,
            IfcType::IfcReinforcingMesh,
            IfcType::IfcTendon,
            IfcType::IfcTendonAnchor,
        ],
    ),
    (IfcType::IfcElementComponent, ELEMENT_COMPONENTS),
    (IfcType::IfcBuildingElement, BUILDING_ELEMENTS),
    (IfcType::IfcBuiltElement, BUILDING_ELEMENTS),
];

impl IfcType {
    /// Check if this class is an instantiable building element
    pub fn is_building_element(&self) -> bool {
        BUILDING_ELEMENTS.contains(self)
    }

    /// The classes a query for `self` returns: itself plus every known
    /// instantiable subtype
    ///
    /// Abstract supertypes expand to their subtypes only.
    pub fn with_subtypes(&self) -> Vec<IfcType> {
        if *self == IfcType::IfcElement {
            return BUILDING_ELEMENTS.iter().chain(OTHER_ELEMENTS).cloned().collect();
        }

        match SUBTYPES.iter().find(|(supertype, _)| supertype == self) {
            Some((_, classes)) => classes.to_vec(),
            None => vec![self.clone()],
        }
    }
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(IfcType::parse(s))
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded attribute value
///
/// Represents any value that can appear in a STEP record's attribute list.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum AttributeValue {
    /// Null value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value, with STEP quote escapes already undone
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string, looking through a typed wrapper
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) => args.first()?.as_string(),
            _ => None,
        }
    }

    /// Try to get as float, accepting integers and typed wrappers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::TypedValue(_, args) => args.first()?.as_float(),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Decoded STEP record
#[derive(Clone, Debug)]
pub struct DecodedEntity {
    /// Entity ID
    pub id: EntityId,
    /// Entity type
    pub ifc_type: IfcType,
    /// Attribute values in order
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Get attribute at index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference at index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string at index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get float at index
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get list of entity references at index
    ///
    /// Non-reference items are dropped; `None` when the attribute is not a list.
    pub fn get_refs(&self, index: usize) -> Option<Vec<EntityId>> {
        self.get(index)
            .and_then(|v| v.as_list())
            .map(|list| list.iter().filter_map(|v| v.as_entity_ref()).collect())
    }
}

/// Model metadata extracted from the STEP header
#[derive(Clone, Debug, Default, Serialize)]
pub struct ModelMetadata {
    /// IFC schema version (e.g., "IFC2X3", "IFC4")
    pub schema_version: String,
    /// File name from header
    pub file_name: Option<String>,
    /// Timestamp from header
    pub timestamp: Option<String>,
    /// Originating system (authoring application)
    pub originating_system: Option<String>,
}
