// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging of identical elements into counted rows

use crate::record::{AggregatedRow, ElementRecord};
use rustc_hash::FxHashMap;

type RowKey = (String, Option<String>);

/// Groups records by `(ifc_type, size)` in first-seen order
///
/// The first record of a key fixes the row's weight and length; later
/// records with the same key only raise the quantity.
#[derive(Debug, Default)]
pub struct TakeoffAggregator {
    index: FxHashMap<RowKey, usize>,
    rows: Vec<AggregatedRow>,
}

impl TakeoffAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record
    pub fn push(&mut self, record: &ElementRecord) {
        let key = (record.ifc_type.clone(), record.size.clone());
        match self.index.get(&key) {
            Some(&row) => self.rows[row].quantity += 1,
            None => {
                self.index.insert(key, self.rows.len());
                self.rows.push(AggregatedRow::first(record));
            }
        }
    }

    /// Add records in order
    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a ElementRecord>) {
        for record in records {
            self.push(record);
        }
    }

    /// Number of distinct rows so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of records pushed so far
    pub fn total_quantity(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.quantity)).sum()
    }

    /// Rows in first-seen key order
    pub fn finish(self) -> Vec<AggregatedRow> {
        self.rows
    }
}

/// Aggregate a whole record list
pub fn aggregate(records: &[ElementRecord]) -> Vec<AggregatedRow> {
    let mut aggregator = TakeoffAggregator::new();
    aggregator.extend(records);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_takeoff_model::EntityId;
    use proptest::prelude::*;

    fn record(id: u32, ifc_type: &str, size: Option<&str>) -> ElementRecord {
        let record = ElementRecord::new(EntityId(id), ifc_type);
        match size {
            Some(size) => record.with_size(size),
            None => record,
        }
    }

    #[test]
    fn test_same_type_and_size_merge() {
        let rows = aggregate(&[
            record(1, "IfcBeam", Some("H-200x100")),
            record(2, "IfcBeam", Some("H-200x100")),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].weight, None);
        assert_eq!(rows[0].length, None);
    }

    #[test]
    fn test_type_is_part_of_the_key() {
        let rows = aggregate(&[
            record(1, "IfcBeam", Some("H-200x100")),
            record(2, "IfcColumn", Some("H-200x100")),
        ]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.quantity == 1));
        assert_eq!(rows[0].ifc_type, "IfcBeam");
        assert_eq!(rows[1].ifc_type, "IfcColumn");
    }

    #[test]
    fn test_unresolved_size_groups_together() {
        let rows = aggregate(&[
            record(1, "IfcBeam", None),
            record(2, "IfcBeam", Some("H-200x100")),
            record(3, "IfcBeam", None),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].size, None);
        assert_eq!(rows[0].quantity, 2);
    }

    #[test]
    fn test_first_record_fixes_figures() {
        let mut aggregator = TakeoffAggregator::new();
        aggregator.push(&record(1, "IfcBeam", Some("H")).with_weight(10.0).with_length(6000.0));
        aggregator.push(&record(2, "IfcBeam", Some("H")).with_weight(99.0).with_length(1.0));
        assert_eq!(aggregator.len(), 1);
        assert_eq!(aggregator.total_quantity(), 2);

        let rows = aggregator.finish();
        assert_eq!(rows[0].weight, Some(10.0));
        assert_eq!(rows[0].length, Some(6000.0));
    }

    #[test]
    fn test_empty_input() {
        let aggregator = TakeoffAggregator::new();
        assert!(aggregator.is_empty());
        assert!(aggregate(&[]).is_empty());
    }

    // ===================
    // Properties
    // ===================

    fn record_strategy() -> impl Strategy<Value = ElementRecord> {
        (
            prop::sample::select(vec!["IfcBeam", "IfcColumn", "IfcMember"]),
            prop::option::of(prop::sample::select(vec!["H-200x100", "H-300x150", "L-65x65"])),
            prop::option::of(0.0f64..100.0),
            prop::option::of(0.0f64..12000.0),
            any::<u32>(),
        )
            .prop_map(|(ifc_type, size, weight, length, id)| ElementRecord {
                element: EntityId(id),
                ifc_type: ifc_type.to_string(),
                size: size.map(str::to_string),
                weight,
                length,
            })
    }

    fn records_strategy() -> impl Strategy<Value = Vec<ElementRecord>> {
        prop::collection::vec(record_strategy(), 0..60)
    }

    /// Aggregating the same input twice gives the same rows.
    fn check_idempotent(records: Vec<ElementRecord>) -> Result<(), TestCaseError> {
        prop_assert_eq!(aggregate(&records), aggregate(&records));
        Ok(())
    }

    /// Each row counts exactly the records sharing its key, and nothing is lost.
    fn check_grouping(records: Vec<ElementRecord>) -> Result<(), TestCaseError> {
        let rows = aggregate(&records);

        for row in &rows {
            let expected = records
                .iter()
                .filter(|r| r.ifc_type == row.ifc_type && r.size == row.size)
                .count();
            prop_assert_eq!(row.quantity as usize, expected);
        }

        let total: usize = rows.iter().map(|r| r.quantity as usize).sum();
        prop_assert_eq!(total, records.len());
        Ok(())
    }

    /// Row figures come from the first record of the key, rows in first-seen order.
    fn check_first_seen(records: Vec<ElementRecord>) -> Result<(), TestCaseError> {
        let rows = aggregate(&records);

        let mut firsts: Vec<&ElementRecord> = Vec::new();
        for r in &records {
            if !firsts
                .iter()
                .any(|f| f.ifc_type == r.ifc_type && f.size == r.size)
            {
                firsts.push(r);
            }
        }

        prop_assert_eq!(rows.len(), firsts.len());
        for (row, first) in rows.iter().zip(firsts) {
            prop_assert_eq!(&row.ifc_type, &first.ifc_type);
            prop_assert_eq!(&row.size, &first.size);
            prop_assert_eq!(row.weight, first.weight);
            prop_assert_eq!(row.length, first.length);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn aggregation_is_idempotent(records in records_strategy()) {
            check_idempotent(records)?;
        }

        #[test]
        fn quantities_match_key_counts(records in records_strategy()) {
            check_grouping(records)?;
        }

        #[test]
        fn first_record_wins(records in records_strategy()) {
            check_first_seen(records)?;
        }
    }
}
