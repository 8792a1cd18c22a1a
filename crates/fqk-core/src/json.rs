//! String-in, string-out helpers over JSON documents.
//!
//! These parse the input with `serde_json` (insertion order preserved),
//! run one transform, and return compact JSON. Use
//! `serde_json::to_string_pretty` on a re-parsed result for readable output.

use crate::error::{FqkError, Result};
use crate::session::Flattener;
use crate::types::Value;

/// Flatten a JSON document into a JSON object keyed by FQK.
///
/// ```
/// use fqk_core::{json::flatten_json, Flattener};
///
/// let flat = flatten_json(r#"{"a":{"b":1},"c":[true]}"#, &Flattener::default()).unwrap();
/// assert_eq!(flat, r#"{"a.b":1,"c.0":true}"#);
/// ```
pub fn flatten_json(json: &str, flattener: &Flattener) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let flat = flattener.flatten_to_container(Value::from(value));
    Ok(serde_json::to_string(&flat.to_json_object())?)
}

/// Unflatten a JSON object of FQK → value back into a nested document,
/// merging repeated keys.
///
/// ```
/// use fqk_core::{json::unflatten_json, Flattener};
///
/// let nested = unflatten_json(r#"{"a.b":1,"c.0":true}"#, &Flattener::default()).unwrap();
/// assert_eq!(nested, r#"{"a":{"b":1},"c":[true]}"#);
/// ```
///
/// # Errors
///
/// Fails on invalid JSON, on input that is not an object, and on an empty
/// separator.
pub fn unflatten_json(json: &str, flattener: &Flattener) -> Result<String> {
    let entries = parse_flat(json)?;
    let nested = flattener.unflatten_to_container(entries)?;
    Ok(serde_json::to_string(&nested.to_json())?)
}

/// Inflate a JSON object of FQK → value without merging (first write wins).
pub fn expand_json(json: &str, flattener: &Flattener) -> Result<String> {
    let entries = parse_flat(json)?;
    let nested = flattener.expand(entries)?;
    Ok(serde_json::to_string(&nested.to_json())?)
}

fn parse_flat(json: &str) -> Result<Vec<(String, Value)>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect()),
        other => Err(FqkError::FlatInput(json_kind(&other).to_string())),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
