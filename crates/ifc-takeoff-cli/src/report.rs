// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON report layout

use serde::Serialize;

use ifc_takeoff::{AggregatedRow, Diagnostic, ElementRecord, Takeoff};
use ifc_takeoff_model::ModelMetadata;

/// A report cell: a figure, or the undefined label in its place
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Cell<'a> {
    Number(f64),
    Label(&'a str),
}

impl<'a> Cell<'a> {
    fn figure(value: Option<f64>, label: &'a str) -> Self {
        value.map_or(Cell::Label(label), Cell::Number)
    }
}

#[derive(Debug, Serialize)]
pub struct ReportRow<'a> {
    pub ifc_type: &'a str,
    pub size: &'a str,
    pub weight: Cell<'a>,
    pub length: Cell<'a>,
    pub quantity: u32,
}

impl<'a> ReportRow<'a> {
    fn new(row: &'a AggregatedRow, label: &'a str) -> Self {
        Self {
            ifc_type: &row.ifc_type,
            size: row.size_or(label),
            weight: Cell::figure(row.weight, label),
            length: Cell::figure(row.length, label),
            quantity: row.quantity,
        }
    }
}

/// Everything written for one run
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub schema: &'a str,
    pub file_name: Option<&'a str>,
    pub element_count: usize,
    pub skipped: usize,
    pub rows: Vec<ReportRow<'a>>,
    pub diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<&'a [ElementRecord]>,
}

impl<'a> Report<'a> {
    pub fn new(
        metadata: &'a ModelMetadata,
        takeoff: &'a Takeoff,
        diagnostics: &'a [Diagnostic],
        label: &'a str,
    ) -> Self {
        Self {
            schema: &metadata.schema_version,
            file_name: metadata.file_name.as_deref(),
            element_count: takeoff.element_count(),
            skipped: takeoff.skipped(),
            rows: takeoff
                .rows
                .iter()
                .map(|row| ReportRow::new(row, label))
                .collect(),
            diagnostics,
            records: None,
        }
    }

    /// Attach the per-element records, builder style
    pub fn with_records(mut self, records: &'a [ElementRecord]) -> Self {
        self.records = Some(records);
        self
    }
}
