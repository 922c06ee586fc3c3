//! Convenient re-exports for common usage.
//!
//! ```ignore
//! use env_typed_checker::prelude::*;
//!
//! fn main() {
//!     let schema = Schema::new()
//!         .entry("PORT", "number")
//!         .entry("DATABASE_URL", "url")
//!         .entry("DEBUG", "boolean?");
//!
//!     let env = validate_all(&schema, &RealEnv::new()).unwrap_or_exit();
//!     println!("listening on {}", env.get_number("PORT").unwrap_or(8080.0));
//! }
//! ```

// ============================================================================
// Stillwater re-exports
// ============================================================================

/// Accumulating result type. [`validate_all`] returns one so it can be
/// combined with other checks via `Validation::all_vec`.
pub use stillwater::Validation;

/// `EnvErrors` implements this so issue lists from separate runs can be merged.
pub use stillwater::Semigroup;

/// Guaranteed non-empty collection backing `EnvErrors`.
pub use stillwater::NonEmptyVec;

// ============================================================================
// Core
// ============================================================================

pub use crate::schema::{parse_entry, BaseType, Schema, SchemaEntry};

pub use crate::coerce::coerce;

pub use crate::validate::{validate, validate_all};

pub use crate::value::{EnvValue, ValidatedEnv};

/// Per-key issue, its kind, and the aggregate.
pub use crate::error::{EnvErrors, EnvValidation, EnvValidationExt, Issue, IssueKind};

// ============================================================================
// Environments and loading
// ============================================================================

pub use crate::env::{EnvLookup, LayeredEnv, MockEnv, RealEnv, SystemEnv};

pub use crate::loader::{load_env_file, load_schema, with_env_file};

pub use crate::error::LoadError;

// ============================================================================
// Output
// ============================================================================

pub use crate::pretty::{ColorOption, PrettyPrintOptions, ValidationExt};
