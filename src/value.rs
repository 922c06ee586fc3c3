//! Coerced values and the validated result mapping.
//!
//! [`EnvValue`] is what a single raw string becomes after coercion.
//! [`ValidatedEnv`] maps every schema key to `Some(value)`, or to `None` for an
//! optional key that had no value.

use serde::Serialize;

/// A typed value produced by coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    /// `string` and `url` values, exactly as supplied
    String(String),
    /// Always finite
    Number(f64),
    Bool(bool),
    /// Any JSON document, including `null`
    Json(serde_json::Value),
}

impl EnvValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EnvValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            EnvValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EnvValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            EnvValue::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Get a human-readable type name for this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            EnvValue::String(_) => "string",
            EnvValue::Number(_) => "number",
            EnvValue::Bool(_) => "boolean",
            EnvValue::Json(_) => "json",
        }
    }

    /// Convert into a JSON value. Numbers that are whole become JSON integers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            EnvValue::String(s) => serde_json::Value::String(s.clone()),
            EnvValue::Number(n) => number_to_json(*n),
            EnvValue::Bool(b) => serde_json::Value::Bool(*b),
            EnvValue::Json(v) => v.clone(),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<String> for EnvValue {
    fn from(s: String) -> Self {
        EnvValue::String(s)
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        EnvValue::String(s.to_string())
    }
}

impl From<f64> for EnvValue {
    fn from(n: f64) -> Self {
        EnvValue::Number(n)
    }
}

impl From<bool> for EnvValue {
    fn from(b: bool) -> Self {
        EnvValue::Bool(b)
    }
}

impl From<serde_json::Value> for EnvValue {
    fn from(v: serde_json::Value) -> Self {
        EnvValue::Json(v)
    }
}

/// The successful outcome of validation.
///
/// Holds one entry per schema key, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedEnv {
    entries: Vec<(String, Option<EnvValue>)>,
}

impl ValidatedEnv {
    /// Build from `(key, value)` pairs; `None` is the absent-marker.
    pub fn from_entries(entries: Vec<(String, Option<EnvValue>)>) -> Self {
        Self { entries }
    }

    /// Get the coerced value for a key.
    ///
    /// Returns `None` both for an absent optional key and for a key outside
    /// the schema; use [`ValidatedEnv::is_absent`] to tell them apart.
    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.slot(key).and_then(Option::as_ref)
    }

    /// True if the key is in the schema and holds the absent-marker.
    pub fn is_absent(&self, key: &str) -> bool {
        matches!(self.slot(key), Some(None))
    }

    /// True if the key was part of the validated schema.
    pub fn contains_key(&self, key: &str) -> bool {
        self.slot(key).is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(EnvValue::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(EnvValue::as_number)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(EnvValue::as_bool)
    }

    pub fn get_json(&self, key: &str) -> Option<&serde_json::Value> {
        self.get(key).and_then(EnvValue::as_json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&EnvValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Render as a JSON object. Absent keys become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(k, v)| {
                let json = v
                    .as_ref()
                    .map(EnvValue::to_json)
                    .unwrap_or(serde_json::Value::Null);
                (k.clone(), json)
            })
            .collect();
        serde_json::Value::Object(map)
    }

    fn slot(&self, key: &str) -> Option<&Option<EnvValue>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl IntoIterator for ValidatedEnv {
    type Item = (String, Option<EnvValue>);
    type IntoIter = std::vec::IntoIter<(String, Option<EnvValue>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
