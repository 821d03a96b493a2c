// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Take-off extraction over an element graph

use crate::aggregate::TakeoffAggregator;
use crate::config::TakeoffConfig;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::error::Result;
use crate::record::{AggregatedRow, ElementRecord};
use crate::resolver::{ElementAssociations, PropertyResolver};
use ifc_takeoff_model::{ElementGraph, EntityId, IfcType, UnreadableElement};
use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt::Display;

/// Result of one extraction run
#[derive(Clone, Debug, Default, Serialize)]
pub struct Takeoff {
    /// Grouped rows in first-seen order
    pub rows: Vec<AggregatedRow>,
    /// Per-element records before grouping, in extraction order
    pub records: Vec<ElementRecord>,
    skipped: usize,
}

impl Takeoff {
    /// Number of elements that made it into the take-off
    pub fn element_count(&self) -> usize {
        self.records.len()
    }

    /// Number of elements left out because their record or their
    /// relationships could not be read
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn skip(
        &mut self,
        sink: &mut dyn DiagnosticsSink,
        element: EntityId,
        ifc_type: &IfcType,
        cause: &dyn Display,
    ) {
        warn!("Skipping {} ({}): {}", element, ifc_type, cause);
        sink.report(Diagnostic {
            element,
            ifc_type: ifc_type.name().to_string(),
            message: cause.to_string(),
        });
        self.skipped += 1;
    }
}

/// Run a take-off over `graph`
///
/// Elements are collected per configured type, in configuration order and
/// then model order. An element listed under several configured types is
/// taken once. An element whose record does not decode, or whose
/// associations fail to load, is reported to `sink` and left out; only a
/// failing type query aborts the run.
///
/// # Errors
///
/// Returns `TakeoffError` for:
/// - An invalid configuration
/// - A graph that cannot be queried for one of the element types
pub fn extract_takeoff(
    graph: &dyn ElementGraph,
    config: &TakeoffConfig,
    sink: &mut dyn DiagnosticsSink,
) -> Result<Takeoff> {
    config.validate()?;

    let resolver = PropertyResolver::new(config);
    let mut aggregator = TakeoffAggregator::new();
    let mut seen = FxHashSet::default();
    let mut takeoff = Takeoff::default();

    for type_name in &config.element_types {
        let entries = graph.entities_of_type(type_name)?;
        debug!("{}: {} elements", type_name, entries.len());

        for entry in entries {
            let element = match entry {
                Ok(element) => element,
                Err(unreadable) => {
                    if seen.insert(unreadable.id) {
                        let UnreadableElement { id, ifc_type, error } = unreadable;
                        takeoff.skip(sink, id, &ifc_type, &error);
                    }
                    continue;
                }
            };
            if !seen.insert(element.id) {
                continue;
            }

            let assoc = match ElementAssociations::load(graph, &element) {
                Ok(assoc) => assoc,
                Err(e) => {
                    takeoff.skip(sink, element.id, &element.ifc_type, &e);
                    continue;
                }
            };

            let record = resolver.resolve(&element, &assoc);
            aggregator.push(&record);
            takeoff.records.push(record);
        }
    }

    takeoff.rows = aggregator.finish();
    info!(
        "Take-off: {} elements in {} rows, {} skipped",
        takeoff.element_count(),
        takeoff.rows.len(),
        takeoff.skipped
    );

    Ok(takeoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeightSource;
    use crate::diagnostics::Diagnostics;
    use crate::TakeoffError;
    use ifc_takeoff_model::{
        Association, Element, ElementEntry, GraphError, ModelMetadata, Property, PropertySet,
    };
    use rustc_hash::FxHashMap;

    /// In-memory graph for pipeline tests
    #[derive(Default)]
    struct FixtureGraph {
        elements: Vec<Element>,
        properties: FxHashMap<EntityId, Vec<Association>>,
        broken: Vec<EntityId>,
        unreadable: Vec<EntityId>,
        metadata: ModelMetadata,
    }

    impl FixtureGraph {
        fn element(mut self, id: u32, ifc_type: IfcType, size: Option<&str>) -> Self {
            let id = EntityId(id);
            self.elements.push(Element::new(id, ifc_type));
            if let Some(size) = size {
                let pset = PropertySet::new("Common").with(Property::new("Profile", size));
                self.properties.insert(id, vec![pset.into()]);
            }
            self
        }

        fn broken(mut self, id: u32) -> Self {
            self.broken.push(EntityId(id));
            self
        }

        fn unreadable(mut self, id: u32) -> Self {
            self.unreadable.push(EntityId(id));
            self
        }
    }

    impl ElementGraph for FixtureGraph {
        fn entities_of_type(
            &self,
            type_name: &str,
        ) -> ifc_takeoff_model::Result<Vec<ElementEntry>> {
            if type_name == "IfcBroken" {
                return Err(GraphError::other("query failed"));
            }
            let wanted = IfcType::parse(type_name).with_subtypes();
            Ok(self
                .elements
                .iter()
                .filter(|e| wanted.contains(&e.ifc_type))
                .map(|e| {
                    if self.unreadable.contains(&e.id) {
                        Err(UnreadableElement {
                            id: e.id,
                            ifc_type: e.ifc_type.clone(),
                            error: GraphError::entity_parse(e.id, "unexpected `@`"),
                        })
                    } else {
                        Ok(e.clone())
                    }
                })
                .collect())
        }

        fn associations_defining_properties(
            &self,
            element: &Element,
        ) -> ifc_takeoff_model::Result<Vec<Association>> {
            if self.broken.contains(&element.id) {
                return Err(GraphError::malformed(element.id, "property", "dangling #99"));
            }
            Ok(self.properties.get(&element.id).cloned().unwrap_or_default())
        }

        fn associations_defining_quantities(
            &self,
            _element: &Element,
        ) -> ifc_takeoff_model::Result<Vec<Association>> {
            Ok(Vec::new())
        }

        fn material_associations(
            &self,
            _element: &Element,
        ) -> ifc_takeoff_model::Result<Vec<Association>> {
            Ok(Vec::new())
        }

        fn metadata(&self) -> &ModelMetadata {
            &self.metadata
        }
    }

    #[test]
    fn test_two_beams_same_size_merge() {
        let graph = FixtureGraph::default()
            .element(1, IfcType::IfcBeam, Some("H-200x100"))
            .element(2, IfcType::IfcBeam, Some("H-200x100"));
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(&graph, &TakeoffConfig::default(), &mut sink).unwrap();
        assert_eq!(takeoff.rows.len(), 1);
        assert_eq!(takeoff.rows[0].quantity, 2);
        assert_eq!(takeoff.rows[0].weight, None);
        assert_eq!(takeoff.rows[0].length, None);
        assert_eq!(takeoff.element_count(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_beam_and_column_stay_apart() {
        let graph = FixtureGraph::default()
            .element(1, IfcType::IfcColumn, Some("H-200x100"))
            .element(2, IfcType::IfcBeam, Some("H-200x100"));
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(&graph, &TakeoffConfig::default(), &mut sink).unwrap();
        assert_eq!(takeoff.rows.len(), 2);
        // Configured type order, not model order
        assert_eq!(takeoff.rows[0].ifc_type, "IfcBeam");
        assert_eq!(takeoff.rows[1].ifc_type, "IfcColumn");
        assert!(takeoff.rows.iter().all(|r| r.quantity == 1));
    }

    #[test]
    fn test_failing_element_is_skipped_and_reported() {
        let graph = FixtureGraph::default()
            .element(1, IfcType::IfcBeam, Some("H-200x100"))
            .element(2, IfcType::IfcBeam, Some("H-200x100"))
            .element(3, IfcType::IfcColumn, None)
            .broken(2);
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(&graph, &TakeoffConfig::default(), &mut sink).unwrap();
        assert_eq!(takeoff.element_count(), 2);
        assert_eq!(takeoff.skipped(), 1);
        assert_eq!(takeoff.rows[0].quantity, 1);

        assert_eq!(sink.len(), 1);
        let diagnostic = &sink.as_slice()[0];
        assert_eq!(diagnostic.element, EntityId(2));
        assert_eq!(diagnostic.ifc_type, "IfcBeam");
        assert!(diagnostic.message.contains("dangling"));
    }

    #[test]
    fn test_unreadable_element_is_skipped_and_reported() {
        let graph = FixtureGraph::default()
            .element(1, IfcType::IfcBeam, Some("H-200x100"))
            .element(2, IfcType::IfcBeam, Some("H-200x100"))
            .unreadable(2);
        let config = TakeoffConfig::default().with_element_types(["IfcBeam", "IfcBeam"]);
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(&graph, &config, &mut sink).unwrap();
        assert_eq!(takeoff.element_count(), 1);
        // Reported once even though both queries return it
        assert_eq!(takeoff.skipped(), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.as_slice()[0].element, EntityId(2));
        assert_eq!(sink.as_slice()[0].ifc_type, "IfcBeam");
        assert!(sink.as_slice()[0].message.contains("unexpected `@`"));
    }

    #[test]
    fn test_failing_query_aborts() {
        let graph = FixtureGraph::default().element(1, IfcType::IfcBeam, None);
        let config = TakeoffConfig::default().with_element_types(["IfcBeam", "IfcBroken"]);
        let mut sink: Vec<Diagnostic> = Vec::new();

        let result = extract_takeoff(&graph, &config, &mut sink);
        assert!(matches!(result, Err(TakeoffError::Graph(_))));
    }

    #[test]
    fn test_overlapping_types_take_each_element_once() {
        let graph = FixtureGraph::default().element(1, IfcType::IfcBeam, None);
        let config = TakeoffConfig::default().with_element_types(["IfcBeam", "ifcbeam"]);
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(&graph, &config, &mut sink).unwrap();
        assert_eq!(takeoff.element_count(), 1);
        assert_eq!(takeoff.rows[0].size, None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let graph = FixtureGraph::default();
        let config = TakeoffConfig::default().with_element_types(Vec::<String>::new());
        let mut sink = Diagnostics::new();

        assert!(matches!(
            extract_takeoff(&graph, &config, &mut sink),
            Err(TakeoffError::Config(_))
        ));
    }

    // ========================================================================
    // Over STEP content
    // ========================================================================

    const FRAME_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('frame.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#10=IFCBEAM('0beam1',$,'B1','first',$,$,$,$);
#11=IFCBEAM('0beam2',$,'B2','second',$,$,$,$);
#12=IFCCOLUMN('0col1',$,'C1',$,$,$,$,$);
#13=IFCBEAM('0beam3',$,'B3',$,$,$,$,$);
#20=IFCPROPERTYSINGLEVALUE('Profile',$,IFCLABEL('H-200x100'),$);
#21=IFCPROPERTYSINGLEVALUE('Weight',$,IFCMASSMEASURE(42.5),$);
#22=IFCPROPERTYSET('0pset1',$,'Common',$,(#20,#21));
#23=IFCRELDEFINESBYPROPERTIES('0rel1',$,$,$,(#10,#11),#22);
#30=IFCQUANTITYLENGTH('Length',$,$,6000.);
#31=IFCELEMENTQUANTITY('0qto1',$,'BaseQuantities',$,$,(#30));
#32=IFCRELDEFINESBYPROPERTIES('0rel2',$,$,$,(#10,#12),#31);
#40=IFCMATERIAL('SS400');
#41=IFCGENERALMATERIALPROPERTIES(#40,$,$,7.85);
#42=IFCISHAPEPROFILEDEF(.AREA.,'H-300x150',$,150.,300.,6.5,9.,$);
#43=IFCMATERIALPROFILE($,$,#40,#42,$,$);
#44=IFCMATERIALPROFILESET($,$,(#43),$);
#45=IFCRELASSOCIATESMATERIAL('0rel3',$,$,$,(#10,#11,#12),#44);
#50=IFCRELDEFINESBYPROPERTIES('0rel4',$,$,$,(#13),#99);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_extract_from_step() {
        let graph = ifc_takeoff_parser::parse(FRAME_IFC).unwrap();
        let mut sink = Diagnostics::new();

        let config = TakeoffConfig::default();
        let takeoff = extract_takeoff(graph.as_ref(), &config, &mut sink).unwrap();

        assert_eq!(takeoff.element_count(), 3);
        assert_eq!(takeoff.skipped(), 1);
        assert_eq!(sink.as_slice()[0].element, EntityId(13));

        assert_eq!(takeoff.rows.len(), 2);
        let beams = &takeoff.rows[0];
        assert_eq!(beams.ifc_type, "IfcBeam");
        assert_eq!(beams.size.as_deref(), Some("H-200x100"));
        assert_eq!(beams.quantity, 2);
        assert_eq!(beams.weight, Some(7.85));
        assert_eq!(beams.length, Some(6000.0));

        let column = &takeoff.rows[1];
        assert_eq!(column.size.as_deref(), Some("H-300x150"));
        assert_eq!(column.length, Some(6000.0));
    }

    #[test]
    fn test_extract_from_step_with_property_weights() {
        let graph = ifc_takeoff_parser::parse(FRAME_IFC).unwrap();
        let config = TakeoffConfig {
            element_types: vec!["IfcBuildingElement".to_string()],
            size_from_description: true,
            weight_source: WeightSource::Property,
            ..Default::default()
        };
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(graph.as_ref(), &config, &mut sink).unwrap();

        // Descriptions now split the two beams
        let sizes: Vec<Option<&str>> = takeoff.rows.iter().map(|r| r.size.as_deref()).collect();
        assert_eq!(sizes, vec![Some("first"), Some("second"), Some("H-300x150")]);
        assert_eq!(takeoff.rows[0].weight, Some(42.5));
        assert_eq!(takeoff.rows[2].weight, None);
    }

    const IFC4_FRAME: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [ReferenceView]'),'2;1');
FILE_NAME('frame4.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#10=IFCBEAMSTANDARDCASE('0bsc',$,'B1',$,$,$,$,$,$);
#11=IFCCOLUMNSTANDARDCASE('0csc',$,'C1',$,$,$,$,$,$);
#12=IFCBEAM('0beam',$,'B2',$,$,$,$,$,$);
#13=IFCBEAM('0bad',$,'B3',@@);
#14=IFCMEMBERSTANDARDCASE('0msc',$,'M1',$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_default_types_include_standard_case_subtypes() {
        let graph = ifc_takeoff_parser::parse(IFC4_FRAME).unwrap();
        let config = TakeoffConfig::default();
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(graph.as_ref(), &config, &mut sink).unwrap();

        let elements: Vec<u32> = takeoff.records.iter().map(|r| r.element.0).collect();
        assert_eq!(elements, vec![10, 12, 11]);
        let types: Vec<&str> = takeoff.rows.iter().map(|r| r.ifc_type.as_str()).collect();
        assert_eq!(types, vec!["IfcBeamStandardCase", "IfcBeam", "IfcColumnStandardCase"]);
    }

    #[test]
    fn test_undecodable_step_element_is_counted() {
        let graph = ifc_takeoff_parser::parse(IFC4_FRAME).unwrap();
        let config = TakeoffConfig::default();
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(graph.as_ref(), &config, &mut sink).unwrap();
        assert_eq!(takeoff.element_count(), 3);
        assert_eq!(takeoff.skipped(), 1);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.as_slice()[0].element, EntityId(13));
        assert_eq!(sink.as_slice()[0].ifc_type, "IfcBeam");
    }

    #[test]
    fn test_element_supertype_reaches_every_subtype() {
        let graph = ifc_takeoff_parser::parse(IFC4_FRAME).unwrap();
        let config = TakeoffConfig::default().with_element_types(["IfcElement"]);
        let mut sink = Diagnostics::new();

        let takeoff = extract_takeoff(graph.as_ref(), &config, &mut sink).unwrap();
        let elements: Vec<u32> = takeoff.records.iter().map(|r| r.element.0).collect();
        assert_eq!(elements, vec![10, 11, 12, 14]);
        assert_eq!(takeoff.skipped(), 1);
    }
}
