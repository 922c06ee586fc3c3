//! Environment access traits for testable I/O.
//!
//! [`EnvLookup`] is the read-only name → value view the validation engine
//! consumes. [`SystemEnv`] adds file reading for the loaders and the CLI.
//! Production code uses [`RealEnv`]; tests use [`MockEnv`] or plain maps.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Read-only access to environment variables.
///
/// An empty string and `None` are treated the same by the engine, but
/// implementations should report what they actually hold.
pub trait EnvLookup {
    /// Get an environment variable by name.
    fn get_env(&self, name: &str) -> Option<String>;
}

/// Environment with file access, used by the schema and env-file loaders.
///
/// ```ignore
/// // Production
/// let code = cli::run(std::env::args_os(), &RealEnv::new(), &mut out, &mut err);
///
/// // Testing
/// let env = MockEnv::new()
///     .with_file("env.schema.json", r#"{"PORT": "number"}"#)
///     .with_env("PORT", "3000");
/// ```
pub trait SystemEnv: EnvLookup + Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` with `ErrorKind::NotFound` for a missing file and
    /// other kinds for permission or encoding failures.
    fn read_file(&self, path: &Path) -> io::Result<String>;
}

impl EnvLookup for HashMap<String, String> {
    fn get_env(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvLookup for HashMap<String, Option<String>> {
    fn get_env(&self, name: &str) -> Option<String> {
        self.get(name).cloned().flatten()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn get_env(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvLookup for BTreeMap<String, Option<String>> {
    fn get_env(&self, name: &str) -> Option<String> {
        self.get(name).cloned().flatten()
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for &T {
    fn get_env(&self, name: &str) -> Option<String> {
        (**self).get_env(name)
    }
}

/// The real process environment and file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealEnv;

impl RealEnv {
    pub fn new() -> Self {
        Self
    }
}

impl EnvLookup for RealEnv {
    fn get_env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl SystemEnv for RealEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// A base environment with a lower-priority overlay.
///
/// Overlay values (typically from a `.env` file) only fill in names the base
/// does not define at all. A base variable set to the empty string still
/// wins over the overlay.
#[derive(Debug, Clone)]
pub struct LayeredEnv<B> {
    base: B,
    overlay: HashMap<String, String>,
}

impl<B: EnvLookup> LayeredEnv<B> {
    pub fn new(base: B, overlay: HashMap<String, String>) -> Self {
        Self { base, overlay }
    }
}

impl<B: EnvLookup> EnvLookup for LayeredEnv<B> {
    fn get_env(&self, name: &str) -> Option<String> {
        self.base
            .get_env(name)
            .or_else(|| self.overlay.get(name).cloned())
    }
}

/// Mock file state for testing.
#[derive(Debug, Clone)]
enum MockFile {
    Content(String),
    PermissionDenied,
}

/// Mock environment for testing.
///
/// # Example
///
/// ```
/// use env_typed_checker::env::{EnvLookup, MockEnv};
///
/// let env = MockEnv::new()
///     .with_file("env.schema.json", r#"{"PORT": "number"}"#)
///     .with_env("PORT", "3000");
///
/// assert_eq!(env.get_env("PORT").as_deref(), Some("3000"));
/// ```
#[derive(Debug, Default)]
pub struct MockEnv {
    files: RwLock<HashMap<PathBuf, MockFile>>,
    env_vars: RwLock<HashMap<String, String>>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::Content(content.into()));
        self
    }

    /// Add a file that will return "permission denied" error.
    pub fn with_unreadable_file(self, path: impl Into<PathBuf>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::PermissionDenied);
        self
    }

    /// Set an environment variable.
    pub fn with_env(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars
            .write()
            .unwrap()
            .insert(name.into(), value.into());
        self
    }

    /// Set multiple environment variables from an iterator.
    pub fn with_envs<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env_vars = self.env_vars.write().unwrap();
        for (k, v) in vars {
            env_vars.insert(k.into(), v.into());
        }
        drop(env_vars);
        self
    }

    /// Update an environment variable.
    pub fn set_env(&self, name: impl Into<String>, value: impl Into<String>) {
        self.env_vars
            .write()
            .unwrap()
            .insert(name.into(), value.into());
    }

    /// Remove an environment variable.
    pub fn remove_env(&self, name: &str) {
        self.env_vars.write().unwrap().remove(name);
    }
}

impl EnvLookup for MockEnv {
    fn get_env(&self, name: &str) -> Option<String> {
        self.env_vars.read().unwrap().get(name).cloned()
    }
}

impl SystemEnv for MockEnv {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        let files = self.files.read().unwrap();

        match files.get(path) {
            Some(MockFile::Content(content)) => Ok(content.clone()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            )),
            Some(MockFile::PermissionDenied) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("mock permission denied: {}", path.display()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_env_reads_files() {
        let env = RealEnv::new();
        // Cargo.toml should exist in the project root
        assert!(env.read_file(Path::new("Cargo.toml")).is_ok());
        let err = env.read_file(Path::new("nonexistent.json")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_env_files() {
        let env = MockEnv::new().with_file("schema.json", "{}");

        assert_eq!(env.read_file(Path::new("schema.json")).unwrap(), "{}");
        let err = env.read_file(Path::new("missing.json")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_env_permission_denied() {
        let env = MockEnv::new().with_unreadable_file(".env");

        let err = env.read_file(Path::new(".env")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_mock_env_vars_and_mutation() {
        let env = MockEnv::new()
            .with_env("PORT", "3000")
            .with_envs([("A", "1"), ("B", "2")]);

        assert_eq!(env.get_env("PORT"), Some("3000".to_string()));
        assert_eq!(env.get_env("B"), Some("2".to_string()));
        assert_eq!(env.get_env("MISSING"), None);

        env.set_env("PORT", "4000");
        assert_eq!(env.get_env("PORT"), Some("4000".to_string()));

        env.remove_env("PORT");
        assert_eq!(env.get_env("PORT"), None);
    }

    #[test]
    fn test_map_lookups() {
        let mut plain = HashMap::new();
        plain.insert("A".to_string(), "1".to_string());
        assert_eq!(plain.get_env("A"), Some("1".to_string()));

        let mut optional: BTreeMap<String, Option<String>> = BTreeMap::new();
        optional.insert("A".to_string(), None);
        optional.insert("B".to_string(), Some(String::new()));
        assert_eq!(optional.get_env("A"), None);
        assert_eq!(optional.get_env("B"), Some(String::new()));
    }

    #[test]
    fn test_layered_env_base_wins() {
        let base = MockEnv::new().with_env("PORT", "3000").with_env("EMPTY", "");
        let mut overlay = HashMap::new();
        overlay.insert("PORT".to_string(), "9999".to_string());
        overlay.insert("EMPTY".to_string(), "filled".to_string());
        overlay.insert("EXTRA".to_string(), "x".to_string());

        let env = LayeredEnv::new(&base, overlay);
        assert_eq!(env.get_env("PORT"), Some("3000".to_string()));
        assert_eq!(env.get_env("EMPTY"), Some(String::new()));
        assert_eq!(env.get_env("EXTRA"), Some("x".to_string()));
        assert_eq!(env.get_env("NONE"), None);
    }
}
