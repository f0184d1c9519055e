//! # JSON Bridge
//!
//! Conversion between [`Value`] and `serde_json::Value`.
//!
//! ## Rendering Rules
//!
//! [`Value::to_json`] follows `JSON.stringify`:
//!
//! 1. `undefined`, functions and symbols have no representation: they are
//!    dropped from objects, become `null` inside arrays, and make the whole
//!    result `None` at the top level.
//! 2. Non-finite numbers become `null`; integral numbers are emitted as
//!    integers so `1` never renders as `1.0`.
//! 3. Valid dates become ISO-8601 strings with millisecond precision;
//!    invalid dates become `null`.
//! 4. Regexps, errors, maps, sets and host objects carry no enumerable
//!    properties and render as `{}`.
//! 5. Typed arrays and argument lists render as index-keyed objects;
//!    buffers as `{"type":"Buffer","data":[...]}`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number};

use crate::classify::classify;
use crate::error::ValueError;
use crate::value::Value;

/// Largest integer magnitude that round-trips through `f64` exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Value {
    /// Render as JSON, or `None` where `JSON.stringify` yields `undefined`.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        match self {
            Value::Undefined | Value::Function(_) | Value::Symbol(_) => None,
            Value::Null => Some(Json::Null),
            Value::Bool(b) => Some(Json::Bool(*b)),
            Value::Number(n) => Some(number_to_json(*n)),
            Value::String(s) => Some(Json::String(s.clone())),
            Value::Array(items) => Some(Json::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(Json::Null))
                    .collect(),
            )),
            Value::Object(map) => Some(Json::Object(
                map.iter()
                    .filter_map(|(k, v)| v.to_json().map(|json| (k.clone(), json)))
                    .collect(),
            )),
            Value::Arguments(items) => Some(index_keyed(
                items.iter().map(|item| item.to_json().unwrap_or(Json::Null)),
            )),
            Value::Date(Some(at)) => Some(Json::String(
                at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            )),
            Value::Date(None) => Some(Json::Null),
            Value::TypedArray(array) => {
                Some(index_keyed(array.to_f64_vec().into_iter().map(number_to_json)))
            }
            Value::Buffer(bytes) => {
                let mut map = Map::new();
                map.insert("type".to_string(), Json::String("Buffer".to_string()));
                map.insert(
                    "data".to_string(),
                    Json::Array(bytes.iter().map(|&b| Json::from(b)).collect()),
                );
                Some(Json::Object(map))
            }
            Value::RegExp(_)
            | Value::Error(_)
            | Value::Map(_)
            | Value::Set(_)
            | Value::Host(_) => Some(Json::Object(Map::new())),
        }
    }

    /// Render as JSON, failing where there is no representation.
    pub fn try_to_json(&self) -> Result<serde_json::Value, ValueError> {
        self.to_json()
            .ok_or_else(|| ValueError::NotRepresentable(classify(self)))
    }

    /// `JSON.stringify` as interpolated into a message: compact JSON text,
    /// or `undefined` when there is no representation.
    pub fn stringify(&self) -> String {
        match self.to_json() {
            Some(json) => json.to_string(),
            None => "undefined".to_string(),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        // -0 renders as 0.
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn index_keyed(items: impl Iterator<Item = serde_json::Value>) -> serde_json::Value {
    serde_json::Value::Object(
        items
            .enumerate()
            .map(|(i, json)| (i.to_string(), json))
            .collect(),
    )
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}

impl Serialize for Value {
    /// Serializes the JSON rendering; values without one serialize as `null`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_json() {
            Some(json) => json.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
