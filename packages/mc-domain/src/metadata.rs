use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional structured payload attached to an activity event.
///
/// Encoded as `{"kind": "<variant>", "value": ...}`. Only these three shapes are accepted, so a
/// caller cannot smuggle arbitrary JSON into the column:
///
/// - `text`: a free-form string.
/// - `fields`: a flat string-to-string map.
/// - `json`: a JSON object (arrays and scalars are rejected).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventMetadata {
	Text(String),
	Fields(BTreeMap<String, String>),
	Json(Map<String, Value>),
}
impl EventMetadata {
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}

	pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
		serde_json::from_value(value)
	}
}
