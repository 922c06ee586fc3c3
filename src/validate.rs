//! The validation engine.
//!
//! Each schema key is checked independently into an [`EnvValidation`], and
//! the per-key outcomes are folded with `Validation::all_vec` so every issue
//! is collected before anything is reported.

use stillwater::Validation;

use crate::coerce::coerce;
use crate::env::EnvLookup;
use crate::error::{EnvErrors, EnvValidation, EnvValidationExt, Issue};
use crate::schema::{parse_entry, Schema};
use crate::value::{EnvValue, ValidatedEnv};

/// Validate an environment against a schema.
///
/// Returns every schema key mapped to its coerced value, or an [`EnvErrors`]
/// listing one issue per failing key in schema order. Never returns a partial
/// result alongside a failure.
///
/// ```
/// use std::collections::HashMap;
/// use env_typed_checker::{validate, Schema};
///
/// let schema = Schema::new().entry("PORT", "number").entry("DEBUG", "boolean?");
/// let env = HashMap::from([("PORT".to_string(), "3000".to_string())]);
///
/// let result = validate(&schema, &env).unwrap();
/// assert_eq!(result.get_number("PORT"), Some(3000.0));
/// assert!(result.is_absent("DEBUG"));
/// ```
pub fn validate<E: EnvLookup + ?Sized>(
    schema: &Schema,
    env: &E,
) -> Result<ValidatedEnv, EnvErrors> {
    match validate_all(schema, env) {
        Validation::Success(values) => Ok(values),
        Validation::Failure(errors) => Err(errors),
    }
}

/// Like [`validate`], but returns the accumulating `Validation` so it can be
/// combined with other checks.
pub fn validate_all<E: EnvLookup + ?Sized>(schema: &Schema, env: &E) -> EnvValidation<ValidatedEnv> {
    if schema.is_empty() {
        return Validation::Success(ValidatedEnv::default());
    }

    let checks: Vec<EnvValidation<(String, Option<EnvValue>)>> = schema
        .iter()
        .map(|(key, declaration)| validate_key(key, declaration, env))
        .collect();

    Validation::all_vec(checks).map(ValidatedEnv::from_entries)
}

/// Resolve a single key.
///
/// A malformed declaration short-circuits before the environment is
/// consulted, so the key never also reports missing or invalid-value.
pub fn validate_key<E: EnvLookup + ?Sized>(
    key: &str,
    declaration: &str,
    env: &E,
) -> EnvValidation<(String, Option<EnvValue>)> {
    let entry = match parse_entry(declaration) {
        Ok(entry) => entry,
        Err(e) => return EnvValidation::fail_with(Issue::invalid_schema(key, e.to_string())),
    };

    let raw = env.get_env(key).filter(|v| !v.is_empty());

    match raw {
        None if entry.optional => Validation::Success((key.to_string(), None)),
        None => EnvValidation::fail_with(Issue::missing(key)),
        Some(raw) => match coerce(entry.base_type, &raw) {
            Ok(value) => Validation::Success((key.to_string(), Some(value))),
            Err(e) => EnvValidation::fail_with(Issue::invalid_value(key, raw, e.to_string())),
        },
    }
}
