// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Take-off Model - Element graph abstractions for quantity take-off
//!
//! This crate defines what a model backend has to offer for a structural
//! take-off: elements of a given class, and the property sets, quantity sets
//! and material associations attached to each element. Backends implement
//! the traits; the take-off engine consumes them without knowing the file
//! format.
//!
//! # Architecture
//!
//! - [`GraphLoader`] - Entry point turning file content into a graph
//! - [`ElementGraph`] - Elements by type and their associations
//! - [`EntityResolver`] - Raw record lookup for adapters built on STEP data
//! - [`Association`] - Closed union of what a relationship can resolve to
//!
//! # Example
//!
//! ```ignore
//! use ifc_takeoff_model::{Association, ElementGraph};
//!
//! let graph = loader.load(ifc_content)?;
//! // Unreadable records come back as `Err` entries
//! for beam in graph.entities_of_type("IfcBeam")?.into_iter().flatten() {
//!     for assoc in graph.material_associations(&beam)? {
//!         if let Association::MaterialProfileSet(set) = assoc {
//!             println!("{}: {:?}", beam.id, set.first_profile_name());
//!         }
//!     }
//! }
//! ```

pub mod element;
pub mod error;
pub mod materials;
pub mod properties;
pub mod resolver;
pub mod traits;
pub mod types;

// Re-export all public types
pub use element::*;
pub use error::*;
pub use materials::*;
pub use properties::*;
pub use resolver::*;
pub use traits::*;
pub use types::*;
