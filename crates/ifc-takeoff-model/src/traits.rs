// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for element graph access
//!
//! These traits are the seam between a model backend (a STEP reader, an
//! in-memory fixture, another parser) and the take-off engine.

use crate::{Association, Element, ElementEntry, ModelMetadata, Result};
use std::path::Path;
use std::sync::Arc;

/// Loading interface - entry point for turning file content into a graph
///
/// # Example
///
/// ```ignore
/// use ifc_takeoff_model::GraphLoader;
///
/// let loader: Box<dyn GraphLoader> = get_loader();
/// let graph = loader.load(ifc_content)?;
/// println!("Schema: {}", graph.metadata().schema_version);
/// ```
pub trait GraphLoader: Send + Sync {
    /// Load a graph from in-memory content
    fn load(&self, content: &str) -> Result<Arc<dyn ElementGraph>>;

    /// Read a file and load it
    fn load_file(&self, path: &Path) -> Result<Arc<dyn ElementGraph>> {
        let content = std::fs::read_to_string(path)?;
        self.load(&content)
    }
}

/// Read-only element graph
///
/// Every accessor returns a `Result`: an `Err` from one of the per-element
/// association accessors means that element's relationships could not be
/// read, and callers are expected to skip only that element. The same holds
/// for an `Err` entry inside the list
/// [`entities_of_type`](ElementGraph::entities_of_type) returns, while an
/// `Err` from the call itself means the graph cannot be queried at all.
///
/// The graph is thread-safe (`Send + Sync`) so independent extractions can
/// share it.
pub trait ElementGraph: Send + Sync {
    /// All elements of the given class and its subtypes, in model order
    ///
    /// The type name is matched case-insensitively and expanded through
    /// [`IfcType::with_subtypes`](crate::IfcType::with_subtypes). A record
    /// of a matching class that fails to decode comes back as an `Err`
    /// entry at its place in the list.
    fn entities_of_type(&self, type_name: &str) -> Result<Vec<ElementEntry>>;

    /// Property sets defining the element (`IfcRelDefinesByProperties`),
    /// in relationship order
    fn associations_defining_properties(&self, element: &Element) -> Result<Vec<Association>>;

    /// Quantity sets defining the element
    fn associations_defining_quantities(&self, element: &Element) -> Result<Vec<Association>>;

    /// Materials and material profile sets associated with the element
    /// (`IfcRelAssociatesMaterial`)
    fn material_associations(&self, element: &Element) -> Result<Vec<Association>>;

    /// File metadata (schema version, file name, ...)
    fn metadata(&self) -> &ModelMetadata;
}
