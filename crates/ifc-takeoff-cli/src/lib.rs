// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI logic for the IFC take-off tool
//!
//! Reads an IFC file, runs the take-off with the configured element types
//! and strategies, and writes a JSON report.

mod args;
mod config;
mod error;
mod report;

pub use args::Args;
pub use error::CliError;
pub use report::{Cell, Report, ReportRow};

use std::{fs, io::Write};

use log::info;

use ifc_takeoff::{extract_takeoff, Diagnostics};

/// Run the take-off CLI
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Files that are not IFC STEP files
/// - Report serialization errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(input_path = args.input; "Processing model");

    let config = config::load_config(args.config.as_ref())?;
    let config = config::apply_overrides(config, args)?;

    let graph = ifc_takeoff_parser::parse_file(&args.input)?;
    let metadata = graph.metadata();
    info!(
        schema = metadata.schema_version,
        file_name:? = metadata.file_name;
        "Model loaded"
    );

    let mut diagnostics = Diagnostics::new();
    let takeoff = extract_takeoff(graph.as_ref(), &config, &mut diagnostics)?;

    let mut report = Report::new(
        metadata,
        &takeoff,
        diagnostics.as_slice(),
        &config.undefined_label,
    );
    if args.include_records {
        report = report.with_records(&takeoff.records);
    }
    let json = serde_json::to_string_pretty(&report)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path; "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
