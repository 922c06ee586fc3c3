//! Loading the schema document and the env-file overlay.
//!
//! File I/O goes through [`SystemEnv`] so both loaders can be exercised with
//! `MockEnv`. Parsing happens after the read completes.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::env::{LayeredEnv, SystemEnv};
use crate::error::LoadError;
use crate::schema::Schema;

/// Default env file consulted when none is named.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Read and parse a JSON schema file.
pub fn load_schema(path: &Path, env: &dyn SystemEnv) -> Result<Schema, LoadError> {
    let content = env.read_file(path).map_err(|source| LoadError::SchemaRead {
        path: path.display().to_string(),
        source,
    })?;

    let schema = Schema::from_json_str(&content).map_err(|source| LoadError::Schema {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(path = %path.display(), keys = schema.len(), "loaded schema");
    Ok(schema)
}

/// Read a dotenv-style file into a name → value map.
///
/// A missing file yields an empty map. When `required` is set the miss is
/// still tolerated but logged at warn level, since the caller named the file
/// explicitly.
pub fn load_env_file(
    path: &Path,
    env: &dyn SystemEnv,
    required: bool,
) -> Result<HashMap<String, String>, LoadError> {
    let content = match env.read_file(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if required {
                tracing::warn!(path = %path.display(), "env file not found, using process environment only");
            } else {
                tracing::debug!(path = %path.display(), "no env file");
            }
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(LoadError::EnvFileRead {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let vars = parse_env_file(&content);

    tracing::debug!(path = %path.display(), vars = vars.len(), "loaded env file");
    Ok(vars)
}

/// One `NAME=value` (or `NAME: value`) assignment, optionally prefixed with
/// `export`. Quoted values may span lines.
const LINE_PATTERN: &str = r#"(?m)^\s*(?:export\s+)?([\w.-]+)(?:\s*=\s*?|:\s+?)(\s*'(?:\\'|[^'])*'|\s*"(?:\\"|[^"])*"|\s*`(?:\\`|[^`])*`|[^#\r\n]+)?\s*(?:#.*)?$"#;

fn line_regex() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| Regex::new(LINE_PATTERN).expect("env file line pattern is valid"))
}

/// Parse dotenv content. Later assignments of the same name win.
///
/// Values are taken literally: `$NAME` is not expanded. Lines that are not
/// assignments are skipped. Inside double quotes `\n` and `\r` become line
/// breaks.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    line_regex()
        .captures_iter(&content)
        .map(|caps| {
            let value = caps.get(2).map_or("", |m| m.as_str());
            (caps[1].to_string(), unquote(value.trim()))
        })
        .collect()
}

fn unquote(value: &str) -> String {
    let Some(quote) = value.chars().next().filter(|c| matches!(c, '\'' | '"' | '`')) else {
        return value.to_string();
    };
    let inner = match value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
        Some(inner) => inner,
        None => return value.to_string(),
    };
    if quote == '"' {
        inner.replace("\\n", "\n").replace("\\r", "\r")
    } else {
        inner.to_string()
    }
}

/// Layer an env file beneath the given environment.
pub fn with_env_file<'a>(
    path: &Path,
    env: &'a dyn SystemEnv,
    required: bool,
) -> Result<LayeredEnv<&'a dyn SystemEnv>, LoadError> {
    let overlay = load_env_file(path, env, required)?;
    Ok(LayeredEnv::new(env, overlay))
}
