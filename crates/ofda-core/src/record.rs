//! # Records
//!
//! Dataset rows are untyped JSON objects. openFDA does not publish a stable
//! schema for the bulk files and the service never interprets fields beyond
//! substring search, so records stay as `serde_json` maps end to end.

use std::borrow::Cow;

use serde_json::Value;

/// A single dataset row: a string-keyed map of heterogeneous JSON values.
///
/// Identity is positional (index within the dataset file). Keys keep the
/// order they have in the file and numbers keep their exact source text
/// (`serde_json` is built with `preserve_order` and `arbitrary_precision`).
pub type Record = serde_json::Map<String, Value>;

/// Render a field value as the text that search terms are matched against.
///
/// Strings render as their contents without quotes. Numbers, booleans and
/// `null` render in canonical JSON form (`42`, `1.5`, `true`, `null`). Arrays
/// and objects render as compact JSON.
pub fn field_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
