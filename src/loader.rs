//! Loads the two export formats into uniform row collections.
//!
//! CSV files become header-keyed text rows. JSON files are either a root
//! array or an object wrapping the row list under one of a few known keys;
//! the first recognized key wins. A document with neither shape reconciles
//! as empty, but is logged so schema drift in an export does not pass
//! silently.

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::{debug, warn};
use serde_json::Value as Json;

use crate::io_utils;

/// One CSV record keyed by header name.
pub type CsvRow = HashMap<String, String>;

/// Keys checked, in order, for the row list inside a JSON object root.
const LIST_KEYS: [&str; 5] = ["data", "tasks", "sessions", "subjects", "categories"];

pub fn read_csv_rows(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<CsvRow>> {
    let mut reader = io_utils::open_csv_reader(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading headers from {path:?}"))?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record =
            record.with_context(|| format!("Reading row {} in {path:?}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {} in {path:?}", row_idx + 2))?;
        let row = headers
            .iter()
            .cloned()
            .zip(decoded)
            .collect::<CsvRow>();
        rows.push(row);
    }
    debug!("Read {} row(s) from {path:?}", rows.len());
    Ok(rows)
}

pub fn read_json_rows(path: &Path) -> Result<Vec<Json>> {
    let file = File::open(path).with_context(|| format!("Opening JSON file {path:?}"))?;
    let reader = BufReader::new(file);
    let document: Json =
        serde_json::from_reader(reader).with_context(|| format!("Parsing JSON {path:?}"))?;
    let rows = extract_row_list(document, path);
    debug!("Read {} row(s) from {path:?}", rows.len());
    Ok(rows)
}

fn extract_row_list(document: Json, path: &Path) -> Vec<Json> {
    match document {
        Json::Object(mut map) => {
            for key in LIST_KEYS {
                if matches!(map.get(key), Some(Json::Array(_))) {
                    if let Some(Json::Array(rows)) = map.remove(key) {
                        return rows;
                    }
                }
            }
            warn!(
                "{path:?} is an object with no recognized list field (expected one of {LIST_KEYS:?}); treating as empty"
            );
            Vec::new()
        }
        Json::Array(rows) => rows,
        other => {
            warn!(
                "{path:?} root is {} rather than an array or object; treating as empty",
                json_kind(&other)
            );
            Vec::new()
        }
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn fake_path() -> PathBuf {
        PathBuf::from("export.json")
    }

    #[test]
    fn extracts_first_recognized_list_key() {
        let doc = json!({"meta": 1, "data": [{"a": 1}], "tasks": [{"b": 2}]});
        let rows = extract_row_list(doc, &fake_path());
        assert_eq!(rows, vec![json!({"a": 1})]);
    }

    #[test]
    fn honors_key_priority_order() {
        // "tasks" precedes "subjects" in the priority list.
        let doc = json!({"subjects": [{"s": 1}], "tasks": [{"t": 1}]});
        let rows = extract_row_list(doc, &fake_path());
        assert_eq!(rows, vec![json!({"t": 1})]);
    }

    #[test]
    fn skips_recognized_keys_holding_non_lists() {
        let doc = json!({"data": "not a list", "subjects": [{"s": 1}]});
        let rows = extract_row_list(doc, &fake_path());
        assert_eq!(rows, vec![json!({"s": 1})]);
    }

    #[test]
    fn root_array_is_returned_directly() {
        let doc = json!([{"a": 1}, {"a": 2}]);
        let rows = extract_row_list(doc, &fake_path());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn unrecognized_object_shape_yields_empty() {
        let doc = json!({"foo": [{"a": 1}]});
        assert!(extract_row_list(doc, &fake_path()).is_empty());
    }

    #[test]
    fn scalar_root_yields_empty() {
        assert!(extract_row_list(json!(42), &fake_path()).is_empty());
    }
}
