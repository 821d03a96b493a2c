// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line argument definitions

use clap::Parser;

/// Structural quantity take-off for IFC files
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input IFC file
    #[arg(help = "Path to the input IFC file")]
    pub input: String,

    /// Path to the JSON report (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Element class to collect; repeat for several (replaces the configured list)
    #[arg(long = "element-type", value_name = "TYPE")]
    pub element_types: Vec<String>,

    /// Weight source: material or property
    #[arg(long)]
    pub weight_source: Option<String>,

    /// Include the per-element records in the report
    #[arg(long)]
    pub include_records: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
