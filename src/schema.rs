//! Schema declarations and the entry parser.
//!
//! A schema maps variable names to declarations such as `"number"` or
//! `"boolean?"`. A trailing `?` marks the variable optional; the rest must be
//! one of the five base type names, matched exactly.

use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidSchema, SchemaError};

/// The closed set of coercion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    String,
    Number,
    Boolean,
    Json,
    Url,
}

impl BaseType {
    /// All base types, in declaration order.
    pub const ALL: [BaseType; 5] = [
        BaseType::String,
        BaseType::Number,
        BaseType::Boolean,
        BaseType::Json,
        BaseType::Url,
    ];

    /// The schema name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            BaseType::String => "string",
            BaseType::Number => "number",
            BaseType::Boolean => "boolean",
            BaseType::Json => "json",
            BaseType::Url => "url",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseType {
    type Err = InvalidSchema;

    /// Case-sensitive, untrimmed match against the five names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| InvalidSchema {
                declared: s.to_string(),
            })
    }
}

/// A parsed schema declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEntry {
    pub base_type: BaseType,
    pub optional: bool,
}

impl fmt::Display for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_type)?;
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// Parse one schema declaration into a base type and optionality flag.
///
/// The error carries the full declaration as written, including any `?`.
///
/// ```
/// use env_typed_checker::schema::{parse_entry, BaseType};
///
/// let entry = parse_entry("boolean?").unwrap();
/// assert_eq!(entry.base_type, BaseType::Boolean);
/// assert!(entry.optional);
///
/// assert!(parse_entry("Number").is_err());
/// ```
pub fn parse_entry(schema_value: &str) -> Result<SchemaEntry, InvalidSchema> {
    let (base, optional) = match schema_value.strip_suffix('?') {
        Some(base) => (base, true),
        None => (schema_value, false),
    };

    let base_type = base.parse::<BaseType>().map_err(|_| InvalidSchema {
        declared: schema_value.to_string(),
    })?;

    Ok(SchemaEntry {
        base_type,
        optional,
    })
}

/// An ordered mapping from variable name to declaration string.
///
/// Declarations are kept as raw strings; they are only parsed during
/// validation, so a bad declaration becomes a per-key issue rather than a
/// construction error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    entries: Vec<(String, String)>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a declaration, builder style.
    ///
    /// ```
    /// use env_typed_checker::Schema;
    ///
    /// let schema = Schema::new()
    ///     .entry("PORT", "number")
    ///     .entry("DEBUG", "boolean?");
    /// assert_eq!(schema.len(), 2);
    /// ```
    pub fn entry(mut self, key: impl Into<String>, declaration: impl Into<String>) -> Self {
        self.insert(key, declaration);
        self
    }

    /// Add or replace a declaration. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, declaration: impl Into<String>) {
        let key = key.into();
        let declaration = declaration.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = declaration,
            None => self.entries.push((key, declaration)),
        }
    }

    /// Get the raw declaration for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, declaration)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Variable names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Parse a schema from JSON text.
    ///
    /// The document must be an object whose values are all strings. Key order
    /// follows the document.
    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| SchemaError::Syntax(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Build a schema from an already-parsed JSON value.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

        let mut schema = Schema::new();
        for (key, declaration) in object {
            if key.is_empty() {
                return Err(SchemaError::EmptyKey);
            }
            let declaration = declaration
                .as_str()
                .ok_or_else(|| SchemaError::NonStringValue {
                    key: key.clone(),
                    found: json_type_name(declaration),
                })?;
            schema.insert(key.clone(), declaration);
        }
        Ok(schema)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (k, v) in iter {
            schema.insert(k, v);
        }
        schema
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_entries() {
        for ty in BaseType::ALL {
            let entry = parse_entry(ty.name()).unwrap();
            assert_eq!(entry.base_type, ty);
            assert!(!entry.optional);
        }
    }

    #[test]
    fn test_parse_optional_entries() {
        let entry = parse_entry("url?").unwrap();
        assert_eq!(entry.base_type, BaseType::Url);
        assert!(entry.optional);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let err = parse_entry("madeup").unwrap_err();
        assert_eq!(err.declared, "madeup");
        assert!(err.to_string().contains("Unsupported type \"madeup\""));
    }

    #[test]
    fn test_parse_is_case_sensitive_and_untrimmed() {
        assert!(parse_entry("Number").is_err());
        assert!(parse_entry("STRING").is_err());
        assert!(parse_entry(" number").is_err());
        assert!(parse_entry("number ").is_err());
        assert!(parse_entry("").is_err());
    }

    #[test]
    fn test_parse_strips_only_one_question_mark() {
        assert!(parse_entry("number??").is_err());
        assert!(parse_entry("?").is_err());
        assert!(parse_entry("?number").is_err());
    }

    #[test]
    fn test_parse_error_keeps_full_declaration() {
        let err = parse_entry("madeup?").unwrap_err();
        assert_eq!(err.declared, "madeup?");
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(parse_entry("json?").unwrap().to_string(), "json?");
        assert_eq!(parse_entry("json").unwrap().to_string(), "json");
    }

    #[test]
    fn test_schema_insert_replaces_in_place() {
        let mut schema = Schema::new().entry("A", "string").entry("B", "number");
        schema.insert("A", "json");
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(schema.get("A"), Some("json"));
    }

    #[test]
    fn test_schema_from_json_preserves_order() {
        let schema = Schema::from_json_str(r#"{"Z": "string", "A": "number?", "M": "url"}"#).unwrap();
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["Z", "A", "M"]);
        assert_eq!(schema.get("A"), Some("number?"));
    }

    #[test]
    fn test_schema_from_json_keeps_unknown_declarations() {
        let schema = Schema::from_json_str(r#"{"X": "madeup"}"#).unwrap();
        assert_eq!(schema.get("X"), Some("madeup"));
    }

    #[test]
    fn test_schema_from_json_rejects_non_object() {
        assert_eq!(
            Schema::from_json_str(r#"["PORT"]"#),
            Err(SchemaError::NotAnObject)
        );
        assert_eq!(Schema::from_json_str("null"), Err(SchemaError::NotAnObject));
    }

    #[test]
    fn test_schema_from_json_rejects_non_string_values() {
        let err = Schema::from_json_str(r#"{"PORT": 123}"#).unwrap_err();
        assert!(err.to_string().contains("string -> string"));
        assert!(matches!(err, SchemaError::NonStringValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn test_schema_from_json_rejects_empty_key() {
        assert_eq!(
            Schema::from_json_str(r#"{"": "string"}"#),
            Err(SchemaError::EmptyKey)
        );
    }

    #[test]
    fn test_schema_from_json_syntax_error() {
        let err = Schema::from_json_str("not-json").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax(_)));
    }

    #[test]
    fn test_schema_from_iterator() {
        let schema: Schema = [("PORT", "number"), ("DEBUG", "boolean?")]
            .into_iter()
            .collect();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("DEBUG"), Some("boolean?"));
    }
}
