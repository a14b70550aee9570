//! Set-difference comparison of the two sides of a table.
//!
//! Rows have no primary key; identity is the full tuple of compared fields
//! after normalization. Duplicates collapse, and "3 rows only on each side"
//! may equally mean 3 distinct rows or 3 rows each off by one field. That
//! coarse granularity is intentional.

use std::{collections::BTreeSet, fmt};

use itertools::Itertools;
use log::debug;
use serde_json::Value as Json;

use crate::{
    loader::CsvRow,
    normalize::{NormValue, RawField, norm_bool, norm_text},
    tables::TableSpec,
};

/// A row reduced to its ordered `(field, normalized value)` pairs; the unit
/// of set membership.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey(pub Vec<(String, NormValue)>);

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({})",
            self.0
                .iter()
                .map(|(field, value)| format!("{field}={value}"))
                .join(", ")
        )
    }
}

#[derive(Debug, Clone)]
pub struct TableDiff {
    pub table: String,
    pub csv_count: usize,
    pub json_count: usize,
    pub only_in_csv: Vec<RowKey>,
    pub only_in_json: Vec<RowKey>,
}

impl TableDiff {
    pub fn is_match(&self) -> bool {
        self.only_in_csv.is_empty() && self.only_in_json.is_empty()
    }
}

pub fn diff_table(spec: &TableSpec, csv_rows: &[CsvRow], json_rows: &[Json]) -> TableDiff {
    let csv_set: BTreeSet<RowKey> = csv_rows
        .iter()
        .filter(|row| !csv_row_is_blank(row))
        .map(|row| csv_row_key(spec, row))
        .collect();

    let json_set: BTreeSet<RowKey> = json_rows
        .iter()
        .filter_map(|row| row.as_object())
        .filter(|map| !json_row_is_blank(map))
        .map(|map| json_row_key(spec, map))
        .collect();

    let only_in_csv: Vec<RowKey> = csv_set.difference(&json_set).cloned().collect();
    let only_in_json: Vec<RowKey> = json_set.difference(&csv_set).cloned().collect();
    debug!(
        "{}: {} CSV row(s), {} JSON row(s), {} only in CSV, {} only in JSON",
        spec.name,
        csv_set.len(),
        json_set.len(),
        only_in_csv.len(),
        only_in_json.len()
    );

    TableDiff {
        table: spec.name.clone(),
        csv_count: csv_set.len(),
        json_count: json_set.len(),
        only_in_csv,
        only_in_json,
    }
}

/// Blankness looks at every raw column of the row, mapped or not, so a row
/// that only carries an ignored value still participates.
fn csv_row_is_blank(row: &CsvRow) -> bool {
    row.values().all(|v| RawField::Csv(v.as_str()).is_falsy())
}

fn json_row_is_blank(map: &serde_json::Map<String, Json>) -> bool {
    map.values().all(|v| RawField::Json(v).is_falsy())
}

fn csv_row_key(spec: &TableSpec, row: &CsvRow) -> RowKey {
    build_key(spec, |source| {
        row.get(source)
            .map(|v| RawField::Csv(v.as_str()))
            .unwrap_or(RawField::Missing)
    })
}

fn json_row_key(spec: &TableSpec, map: &serde_json::Map<String, Json>) -> RowKey {
    build_key(spec, |source| {
        map.get(source).map(RawField::Json).unwrap_or(RawField::Missing)
    })
}

fn build_key<'a, F>(spec: &TableSpec, lookup: F) -> RowKey
where
    F: Fn(&str) -> RawField<'a>,
{
    let pairs = spec
        .compared_fields()
        .map(|field| {
            let raw = lookup(field.source());
            let value = if spec.is_boolean(field.output()) {
                norm_bool(raw)
            } else {
                norm_text(raw)
            };
            (field.output().to_string(), value)
        })
        .collect();
    RowKey(pairs)
}
