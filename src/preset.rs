//! Source record to preset transformation
//!
//! A source file is any JSON object. Only a handful of fields are recognized:
//!
//! ```text
//! Source:  {"Root": "r1", "Id": "i1", "Name": "n1", "Parent": "p1", "Items": [1, 2]}
//! Preset:  {"_changeWeaponName": false, "_id": "i1", "_items": [1, 2],
//!           "_name": "n1", "_parent": "p1", "_type": "Preset"}
//! ```
//!
//! `Root` becomes the key of the preset in the merged document. It is not
//! copied into the preset itself.

use serde::Serialize;
use serde_json::{Map, Value};

/// Field holding the merge key
pub const ROOT_FIELD: &str = "Root";

/// Type tag written on every preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PresetType {
    #[default]
    Preset,
}

/// Output record. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    #[serde(rename = "_changeWeaponName")]
    pub change_weapon_name: bool,
    #[serde(rename = "_id")]
    pub id: Value,
    #[serde(rename = "_items")]
    pub items: Value,
    #[serde(rename = "_name")]
    pub name: Value,
    #[serde(rename = "_parent")]
    pub parent: Value,
    #[serde(rename = "_type")]
    pub preset_type: PresetType,
}

impl Preset {
    /// Build a preset from a parsed source object.
    ///
    /// Absent `Id`, `Name` and `Parent` become `null`; absent `Items` becomes
    /// `[]`. Present values, explicit `null` included, are copied as-is.
    pub fn from_source(source: &Map<String, Value>) -> Self {
        let field = |name: &str| source.get(name).cloned().unwrap_or(Value::Null);

        Self {
            change_weapon_name: false,
            id: field("Id"),
            items: source
                .get("Items")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            name: field("Name"),
            parent: field("Parent"),
            preset_type: PresetType::Preset,
        }
    }
}

/// Why a `Root` value could not be turned into a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootError {
    /// Absent or falsy: `null`, `""`, `false`, `0`, `[]`, `{}`
    Missing,
    /// A non-empty array or object
    Unusable(&'static str),
}

/// Extract the merge key from a source object.
///
/// Strings are used verbatim, non-zero numbers by their JSON text and `true`
/// as `"true"`. Everything falsy counts as missing.
pub fn root_key(source: &Map<String, Value>) -> Result<String, RootError> {
    match source.get(ROOT_FIELD) {
        None | Some(Value::Null | Value::Bool(false)) => Err(RootError::Missing),
        Some(Value::Bool(true)) => Ok("true".to_string()),
        Some(Value::String(s)) if s.is_empty() => Err(RootError::Missing),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(0.0) {
                Err(RootError::Missing)
            } else {
                Ok(n.to_string())
            }
        }
        Some(Value::Array(a)) if a.is_empty() => Err(RootError::Missing),
        Some(Value::Array(_)) => Err(RootError::Unusable("array")),
        Some(Value::Object(o)) if o.is_empty() => Err(RootError::Missing),
        Some(Value::Object(_)) => Err(RootError::Unusable("object")),
    }
}

/// Name of a JSON value's type, for diagnostics
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
