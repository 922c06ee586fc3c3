//! env-typed-checker: validate environment variables against a typed schema.
//!
//! A schema maps variable names to one of five base types, optionally marked
//! with a trailing `?`. Validation coerces every raw value and reports ALL
//! problems at once instead of stopping at the first one.
//!
//! # Core Concepts
//!
//! - **Error Accumulation**: every key is evaluated; failures are collected into
//!   a single [`EnvErrors`]
//! - **Typed Coercion**: `string`, `number`, `boolean`, `json`, `url`
//! - **Optional Keys**: `"boolean?"` tolerates an absent or empty value
//! - **Testable I/O**: environments are injected through [`EnvLookup`] and
//!   [`SystemEnv`]
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use env_typed_checker::{validate, Schema};
//!
//! let schema = Schema::from_json_str(r#"{"PORT": "number", "DEBUG": "boolean?"}"#).unwrap();
//! let env = HashMap::from([
//!     ("PORT".to_string(), "3000".to_string()),
//!     ("DEBUG".to_string(), "true".to_string()),
//! ]);
//!
//! let values = validate(&schema, &env).unwrap();
//! assert_eq!(values.get_number("PORT"), Some(3000.0));
//! assert_eq!(values.get_bool("DEBUG"), Some(true));
//! ```
//!
//! When validation fails, every implicated key is listed:
//!
//! ```text
//! Environment validation failed (3):
//!   PORT: expected number, got "abc"
//!   DB_URL: expected url, got "not-a-url"
//!   REQ: missing required environment variable
//! ```
//!
//! # Architecture
//!
//! The core ([`schema`], [`mod@coerce`], [`mod@validate`], [`value`]) is pure: no I/O,
//! no logging. The shell ([`loader`], [`cli`]) reads files through
//! [`SystemEnv`] and logs with `tracing`.
//!
//! # Module Structure
//!
//! - [`prelude`]: Convenient re-exports for common usage
//! - [`schema`]: `Schema`, `BaseType`, and the entry parser
//! - [`mod@coerce`]: Per-type value coercion
//! - [`mod@validate`]: The validation engine
//! - [`value`]: `EnvValue` and `ValidatedEnv`
//! - [`error`]: `Issue`, `EnvErrors`, and loader errors
//! - [`mod@env`]: `EnvLookup`/`SystemEnv` traits, `RealEnv`, `MockEnv`, `LayeredEnv`
//! - [`loader`]: Schema file and env-file loading
//! - [`pretty`]: Colorized error output
//! - [`cli`]: The `check` command

pub mod cli;
pub mod coerce;
pub mod env;
pub mod error;
pub mod loader;
pub mod prelude;
pub mod pretty;
pub mod schema;
pub mod validate;
pub mod value;

pub use coerce::coerce;
pub use env::{EnvLookup, LayeredEnv, MockEnv, RealEnv, SystemEnv};
pub use error::{
    CoerceError, EnvErrors, EnvValidation, EnvValidationExt, InvalidSchema, Issue, IssueKind,
    LoadError, SchemaError,
};
pub use loader::{load_env_file, load_schema, with_env_file};
pub use pretty::{ColorOption, PrettyPrintOptions, ValidationExt};
pub use schema::{parse_entry, BaseType, Schema, SchemaEntry};
pub use validate::{validate, validate_all, validate_key};
pub use value::{EnvValue, ValidatedEnv};

// Re-export stillwater types that are commonly used
pub use stillwater::{NonEmptyVec, Semigroup, Validation};
