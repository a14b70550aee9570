//! Scalar normalization applied to fields before comparison.
//!
//! Both sources funnel through [`RawField`]: a CSV cell is always text, a
//! JSON field can be any scalar. [`norm_bool`] folds the common truthy and
//! falsy spellings into a real boolean; everything else compares as text via
//! [`norm_text`]. A value `norm_bool` does not recognize stays a string on
//! purpose, so an ambiguous CSV cell like `"maybe"` never silently equals a
//! JSON boolean.

use std::fmt;

use serde_json::Value as Json;

/// A field value after normalization, the unit of comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NormValue {
    Bool(bool),
    Text(String),
}

impl fmt::Display for NormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormValue::Bool(b) => write!(f, "{b}"),
            NormValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// A raw field as read from either source, before normalization.
#[derive(Debug, Clone, Copy)]
pub enum RawField<'a> {
    Csv(&'a str),
    Json(&'a Json),
    /// The source row has no such key; reads as an empty string.
    Missing,
}

impl RawField<'_> {
    fn as_text(&self) -> String {
        match self {
            RawField::Csv(s) => (*s).to_string(),
            RawField::Json(Json::Null) | RawField::Missing => String::new(),
            RawField::Json(Json::String(s)) => s.clone(),
            RawField::Json(Json::Number(n)) => n.to_string(),
            RawField::Json(Json::Bool(b)) => b.to_string(),
            // Arrays and objects stringify as compact JSON.
            RawField::Json(other) => other.to_string(),
        }
    }

    /// Falsiness used for blank-row detection: empty text on the CSV side;
    /// null, false, empty string, zero, and empty containers on the JSON side.
    pub fn is_falsy(&self) -> bool {
        match self {
            RawField::Csv(s) => s.is_empty(),
            RawField::Missing => true,
            RawField::Json(value) => match value {
                Json::Null => true,
                Json::Bool(b) => !b,
                Json::String(s) => s.is_empty(),
                Json::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
                Json::Array(items) => items.is_empty(),
                Json::Object(map) => map.is_empty(),
            },
        }
    }
}

/// Normalizes a boolean-valued field. JSON booleans pass through and null
/// reads as false; recognized textual spellings fold to a boolean; anything
/// else is kept as its trimmed, lowercased text and will compare unequal to
/// either boolean.
pub fn norm_bool(field: RawField<'_>) -> NormValue {
    match field {
        RawField::Json(Json::Bool(b)) => NormValue::Bool(*b),
        RawField::Json(Json::Null) | RawField::Missing => NormValue::Bool(false),
        other => {
            let lowered = other.as_text().trim().to_ascii_lowercase();
            match lowered.as_str() {
                "true" | "yes" | "1" => NormValue::Bool(true),
                "false" | "no" | "0" | "" => NormValue::Bool(false),
                _ => NormValue::Text(lowered),
            }
        }
    }
}

/// Normalizes any other field to text. Null and missing read as empty;
/// numbers keep their source textual representation.
pub fn norm_text(field: RawField<'_>) -> NormValue {
    NormValue::Text(field.as_text())
}
