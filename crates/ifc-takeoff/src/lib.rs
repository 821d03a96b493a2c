// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Take-off - structural bill of quantities from an element graph
//!
//! For every element of the configured classes the engine resolves a size
//! descriptor, a weight and a length through ordered fallbacks over the
//! element's property sets, quantity sets and materials, then merges
//! identical elements into counted rows.
//!
//! # Architecture
//!
//! - [`PropertyResolver`] - Per-element size / weight / length cascades
//! - [`TakeoffAggregator`] - Grouping by `(type, size)` in first-seen order
//! - [`extract_takeoff`] - Drives both over an [`ElementGraph`](ifc_takeoff_model::ElementGraph)
//! - [`DiagnosticsSink`] - Receives elements left out of the run
//!
//! # Example
//!
//! ```ignore
//! use ifc_takeoff::{extract_takeoff, Diagnostics, TakeoffConfig};
//!
//! let graph = ifc_takeoff_parser::parse(ifc_content)?;
//! let mut diagnostics = Diagnostics::new();
//! let takeoff = extract_takeoff(graph.as_ref(), &TakeoffConfig::default(), &mut diagnostics)?;
//!
//! for row in &takeoff.rows {
//!     println!("{} {} x{}", row.ifc_type, row.size_or("N/A"), row.quantity);
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod resolver;

pub use aggregate::{aggregate, TakeoffAggregator};
pub use config::{TakeoffConfig, WeightSource};
pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsSink};
pub use error::{Result, TakeoffError};
pub use pipeline::{extract_takeoff, Takeoff};
pub use record::{figure_or, AggregatedRow, ElementRecord};
pub use resolver::{ElementAssociations, PropertyResolver};
