//! Error types for environment validation.
//!
//! Per-key problems are [`Issue`] values collected during a validation run.
//! Only the aggregate, [`EnvErrors`], crosses the engine boundary. It wraps a
//! stillwater `NonEmptyVec` so a failure always carries at least one issue.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use stillwater::{NonEmptyVec, Semigroup, Validation};

/// What went wrong for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// A required variable is absent or empty.
    Missing,
    /// The schema declaration for the key does not name a known type.
    InvalidSchema,
    /// A value is present but could not be coerced to the declared type.
    InvalidValue,
}

impl IssueKind {
    /// Coarse category: `"missing"` or `"invalid"`.
    pub fn category(&self) -> &'static str {
        match self {
            IssueKind::Missing => "missing",
            IssueKind::InvalidSchema | IssueKind::InvalidValue => "invalid",
        }
    }

    /// True for both invalid-schema and invalid-value issues.
    pub fn is_invalid(&self) -> bool {
        !matches!(self, IssueKind::Missing)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Missing => write!(f, "missing"),
            IssueKind::InvalidSchema => write!(f, "invalid-schema"),
            IssueKind::InvalidValue => write!(f, "invalid-value"),
        }
    }
}

/// A single per-key validation failure.
///
/// Serializes as `{ key, kind, detail, message }`, where `kind` is the coarse
/// [`IssueKind::category`] and `detail` the full kind. The raw value is never
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Environment variable name
    pub key: String,
    pub kind: IssueKind,
    /// Human-readable explanation
    pub message: String,
    /// Offending raw value, kept for redaction in pretty output
    pub raw: Option<String>,
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Issue", 4)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("kind", self.kind.category())?;
        state.serialize_field("detail", &self.kind)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

impl Issue {
    /// A required variable with no usable value.
    pub fn missing(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: IssueKind::Missing,
            message: "missing required environment variable".to_string(),
            raw: None,
        }
    }

    /// A malformed schema declaration.
    pub fn invalid_schema(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: IssueKind::InvalidSchema,
            message: message.into(),
            raw: None,
        }
    }

    /// A value that failed coercion.
    pub fn invalid_value(
        key: impl Into<String>,
        raw: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            kind: IssueKind::InvalidValue,
            message: message.into(),
            raw: Some(raw.into()),
        }
    }

    /// Get a suggestion for fixing this issue.
    pub fn suggestion(&self) -> String {
        match self.kind {
            IssueKind::Missing => {
                format!("Set '{}' in the environment or env file", self.key)
            }
            IssueKind::InvalidSchema => format!(
                "Declare '{}' as one of string, number, boolean, json, url (append ? if optional)",
                self.key
            ),
            IssueKind::InvalidValue => {
                format!("Fix the value of '{}' or mark it optional", self.key)
            }
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Every issue found in one validation run. Never empty.
#[derive(Debug, Clone)]
pub struct EnvErrors(pub NonEmptyVec<Issue>);

impl EnvErrors {
    /// Create from a single issue.
    pub fn single(issue: Issue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Try to create from a vec, returning None if empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    /// Get the first issue (always exists).
    pub fn first(&self) -> &Issue {
        self.0.head()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    /// Keys implicated, in issue order.
    pub fn keys(&self) -> Vec<&str> {
        self.iter().map(|i| i.key.as_str()).collect()
    }

    /// Clone the issues out as a plain vec.
    pub fn to_vec(&self) -> Vec<Issue> {
        self.iter().cloned().collect()
    }

    /// Find the issue recorded for a key, if any.
    pub fn get(&self, key: &str) -> Option<&Issue> {
        self.iter().find(|i| i.key == key)
    }

    /// Issues of one kind.
    pub fn of_kind(&self, kind: IssueKind) -> Vec<&Issue> {
        self.iter().filter(|i| i.kind == kind).collect()
    }

    /// Serialize the issue list as a JSON array.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.iter()
                .map(|i| serde_json::to_value(i).unwrap_or(serde_json::Value::Null))
                .collect(),
        )
    }
}

impl Semigroup for EnvErrors {
    fn combine(self, other: Self) -> Self {
        Self(self.0.combine(other.0))
    }
}

impl From<Issue> for EnvErrors {
    fn from(issue: Issue) -> Self {
        Self::single(issue)
    }
}

impl IntoIterator for EnvErrors {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl fmt::Display for EnvErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Environment validation failed ({}):", self.len())?;
        for issue in self.iter() {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for EnvErrors {}

/// Accumulating result type used throughout the engine.
pub type EnvValidation<T> = Validation<T, EnvErrors>;

/// Extension trait for creating failing validations easily.
pub trait EnvValidationExt<T> {
    fn fail_with(issue: Issue) -> EnvValidation<T>;
}

impl<T> EnvValidationExt<T> for EnvValidation<T> {
    fn fail_with(issue: Issue) -> EnvValidation<T> {
        Validation::Failure(EnvErrors::single(issue))
    }
}

/// Schema declaration that does not name a supported base type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported type \"{declared}\". Supported: string, number, boolean, json, url (optional with ?)")]
pub struct InvalidSchema {
    pub declared: String,
}

/// A raw value that could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("expected number, got \"{raw}\"")]
    Number { raw: String },

    #[error("expected boolean (true/false/1/0/yes/no/on/off), got \"{raw}\"")]
    Boolean { raw: String },

    #[error("expected json, got \"{raw}\": {reason}")]
    Json { raw: String, reason: String },

    #[error("expected url, got \"{raw}\"")]
    Url { raw: String },
}

impl CoerceError {
    /// The offending raw text.
    pub fn raw(&self) -> &str {
        match self {
            CoerceError::Number { raw }
            | CoerceError::Boolean { raw }
            | CoerceError::Json { raw, .. }
            | CoerceError::Url { raw } => raw,
        }
    }
}

/// Structural problems with a schema document as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema must be a JSON object of key -> type.")]
    NotAnObject,

    #[error("Schema must be a JSON object of string -> string. Key '{key}' maps to {found}.")]
    NonStringValue { key: String, found: &'static str },

    #[error("Schema keys must be non-empty variable names.")]
    EmptyKey,

    #[error("Schema is not valid JSON: {0}")]
    Syntax(String),
}

/// Failures while reading schema or env files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read schema file {path}: {source}")]
    SchemaRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema in {path}: {source}")]
    Schema {
        path: String,
        #[source]
        source: SchemaError,
    },

    #[error("cannot read env file {path}: {source}")]
    EnvFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display_contains_key() {
        let issue = Issue::missing("PORT");
        assert_eq!(
            issue.to_string(),
            "PORT: missing required environment variable"
        );
    }

    #[test]
    fn test_issue_kind_category() {
        assert_eq!(IssueKind::Missing.category(), "missing");
        assert_eq!(IssueKind::InvalidSchema.category(), "invalid");
        assert_eq!(IssueKind::InvalidValue.category(), "invalid");
        assert!(!IssueKind::Missing.is_invalid());
        assert!(IssueKind::InvalidValue.is_invalid());
    }

    #[test]
    fn test_env_errors_single() {
        let errors = EnvErrors::single(Issue::missing("A"));
        assert_eq!(errors.len(), 1);
        assert!(!errors.is_empty());
        assert_eq!(errors.first().key, "A");
    }

    #[test]
    fn test_env_errors_from_empty_vec() {
        assert!(EnvErrors::from_vec(vec![]).is_none());
    }

    #[test]
    fn test_env_errors_combine_preserves_order() {
        let e1 = EnvErrors::single(Issue::missing("A"));
        let e2 = EnvErrors::single(Issue::invalid_value("B", "x", "expected number, got \"x\""));
        let combined = e1.combine(e2);
        assert_eq!(combined.keys(), vec!["A", "B"]);
    }

    #[test]
    fn test_env_errors_display_lists_every_key() {
        let errors = EnvErrors::from_vec(vec![
            Issue::missing("REQ"),
            Issue::invalid_value("PORT", "abc", "expected number, got \"abc\""),
        ])
        .unwrap();

        let text = errors.to_string();
        assert!(text.starts_with("Environment validation failed (2):"));
        assert!(text.contains("  REQ: missing required environment variable"));
        assert!(text.contains("  PORT: expected number, got \"abc\""));
    }

    #[test]
    fn test_env_errors_to_json() {
        let errors = EnvErrors::single(Issue::invalid_schema("X", "bad"));
        let json = errors.to_json();
        assert_eq!(json[0]["key"], "X");
        assert_eq!(json[0]["kind"], "invalid");
        assert_eq!(json[0]["detail"], "invalid-schema");
        assert_eq!(json[0]["message"], "bad");
        assert!(json[0].get("raw").is_none());
    }

    #[test]
    fn test_issue_json_kind_is_coarse_category() {
        let errors = EnvErrors::from_vec(vec![
            Issue::missing("A"),
            Issue::invalid_value("B", "x", "expected number, got \"x\""),
        ])
        .unwrap();
        let json = errors.to_json();
        assert_eq!(json[0]["kind"], "missing");
        assert_eq!(json[0]["detail"], "missing");
        assert_eq!(json[1]["kind"], "invalid");
        assert_eq!(json[1]["detail"], "invalid-value");
        assert!(json[1].get("raw").is_none());
    }

    #[test]
    fn test_fail_with() {
        let result: EnvValidation<()> = EnvValidation::fail_with(Issue::missing("A"));
        assert!(result.is_failure());
    }

    #[test]
    fn test_invalid_schema_message() {
        let err = InvalidSchema {
            declared: "madeup".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported type \"madeup\". Supported: string, number, boolean, json, url (optional with ?)"
        );
    }

    #[test]
    fn test_coerce_error_raw() {
        let err = CoerceError::Json {
            raw: "{".to_string(),
            reason: "EOF".to_string(),
        };
        assert_eq!(err.raw(), "{");
        assert!(err.to_string().starts_with("expected json, got \"{\""));
    }
}
