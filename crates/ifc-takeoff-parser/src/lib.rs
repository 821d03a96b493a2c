// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Take-off Parser - STEP reader for the take-off element graph
//!
//! This crate reads IFC (STEP physical) files and implements the
//! [`ElementGraph`](ifc_takeoff_model::ElementGraph) and
//! [`GraphLoader`](ifc_takeoff_model::GraphLoader) traits from
//! `ifc-takeoff-model`.
//!
//! # Features
//!
//! - **Fast tokenization** using `nom` combinators
//! - **SIMD-accelerated scanning** using `memchr`
//! - **Lazy entity decoding** - records are only parsed when reached
//! - **Arc-based caching** - decoded records are shared between lookups
//!
//! # Example
//!
//! ```ignore
//! use ifc_takeoff_parser::StepLoader;
//! use ifc_takeoff_model::GraphLoader;
//!
//! let graph = StepLoader::new().load(ifc_content)?;
//! let beams = graph.entities_of_type("IfcBeam")?;
//! println!("Found {} beams", beams.len());
//! ```

mod graph;
mod resolver;
mod scanner;
mod tokenizer;

pub use graph::{StepGraph, StepLoader};
pub use resolver::ResolverImpl;
pub use scanner::{parse_header, EntityIndex, EntityScanner, RecordSpan};
pub use tokenizer::{parse_entity, parse_record};

use ifc_takeoff_model::{ElementGraph, GraphLoader, Result};
use std::path::Path;
use std::sync::Arc;

/// Quick load function for simple use cases
pub fn parse(content: &str) -> Result<Arc<dyn ElementGraph>> {
    StepLoader::new().load(content)
}

/// Read and load an IFC file from disk
pub fn parse_file(path: impl AsRef<Path>) -> Result<Arc<dyn ElementGraph>> {
    StepLoader::new().load_file(path.as_ref())
}
