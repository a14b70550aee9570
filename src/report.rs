//! Renders per-table diff sections into the final text report.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::compare::{RowKey, TableDiff};

pub struct ReportBuilder {
    lines: Vec<String>,
    samples: usize,
}

impl ReportBuilder {
    pub fn new(samples: usize) -> Self {
        Self {
            lines: Vec::new(),
            samples,
        }
    }

    pub fn push_table(&mut self, diff: &TableDiff) {
        self.lines.push(format!("== {} ==", diff.table));
        self.lines.push(format!(
            "CSV count: {}, JSON count: {}",
            diff.csv_count, diff.json_count
        ));
        if diff.is_match() {
            self.lines
                .push("MATCH: Data sets are identical (for compared fields).".to_string());
        } else {
            if !diff.only_in_csv.is_empty() {
                self.lines.push(side_line("CSV", &diff.only_in_csv, self.samples));
            }
            if !diff.only_in_json.is_empty() {
                self.lines
                    .push(side_line("JSON", &diff.only_in_json, self.samples));
            }
        }
        self.lines.push(String::new());
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

fn side_line(side: &str, rows: &[RowKey], samples: usize) -> String {
    let sample = rows.iter().take(samples).map(|k| k.to_string()).join(", ");
    format!("Only in {side} ({}): sample -> [{sample}]", rows.len())
}

/// Writes the report to the given file, or stdout when no path is set.
pub fn emit(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{report}\n"))
            .with_context(|| format!("Writing report to {path:?}")),
        None => {
            println!("{report}");
            Ok(())
        }
    }
}
