//! Pretty printing for validation failures.
//!
//! This module provides colorized, grouped issue output with fix hints,
//! redaction of secret-looking values, and truncation.
//!
//! # Output Format
//!
//! ```text
//! Environment validation failed (3):
//!
//!   Missing:
//!     • REQ: missing required environment variable
//!
//!   Invalid value:
//!     • PORT: expected number, got "abc"
//!     • API_TOKEN: expected json, got "[REDACTED]": ...
//!
//! Hints:
//!   • Set 'REQ' in the environment or env file
//! ```

use std::io::Write;

use stillwater::Validation;

use crate::error::{EnvErrors, EnvValidation, Issue, IssueKind};

/// Options for pretty printing issues.
#[derive(Debug, Clone)]
pub struct PrettyPrintOptions {
    /// Enable colored output (auto-detected by default).
    pub color: ColorOption,
    /// Group issues under a heading per kind.
    pub group_by_kind: bool,
    /// Show fix suggestions.
    pub show_suggestions: bool,
    /// Maximum issues to display (None for all).
    pub max_errors: Option<usize>,
    /// Redact values of secret-looking variables.
    pub redact_sensitive: bool,
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self {
            color: ColorOption::Auto,
            group_by_kind: true,
            show_suggestions: true,
            max_errors: Some(20),
            redact_sensitive: true,
        }
    }
}

impl PrettyPrintOptions {
    /// Create options with colors disabled.
    pub fn no_color() -> Self {
        Self {
            color: ColorOption::Never,
            ..Default::default()
        }
    }

    /// Create options that show all issues (no truncation).
    pub fn show_all() -> Self {
        Self {
            max_errors: None,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: ColorOption) -> Self {
        self.color = color;
        self
    }

    pub fn with_grouping(mut self, group: bool) -> Self {
        self.group_by_kind = group;
        self
    }

    pub fn with_suggestions(mut self, show: bool) -> Self {
        self.show_suggestions = show;
        self
    }

    pub fn with_max_errors(mut self, max: Option<usize>) -> Self {
        self.max_errors = max;
        self
    }

    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact_sensitive = redact;
        self
    }
}

/// Color output option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorOption {
    /// Auto-detect based on terminal capability and `NO_COLOR`.
    #[default]
    Auto,
    Always,
    Never,
}

/// ANSI color codes for terminal output.
struct Colors {
    error: &'static str,
    warning: &'static str,
    info: &'static str,
    key: &'static str,
    hint: &'static str,
    reset: &'static str,
}

impl Colors {
    fn enabled() -> Self {
        Self {
            error: "\x1b[1;31m",   // bold red
            warning: "\x1b[1;33m", // bold yellow
            info: "\x1b[1;36m",    // bold cyan
            key: "\x1b[1;37m",     // bold white
            hint: "\x1b[32m",      // green
            reset: "\x1b[0m",
        }
    }

    fn disabled() -> Self {
        Self {
            error: "",
            warning: "",
            info: "",
            key: "",
            hint: "",
            reset: "",
        }
    }
}

struct IssuePrinter<'a> {
    options: &'a PrettyPrintOptions,
    colors: Colors,
}

impl<'a> IssuePrinter<'a> {
    fn new(options: &'a PrettyPrintOptions, use_color: bool) -> Self {
        let colors = if use_color {
            Colors::enabled()
        } else {
            Colors::disabled()
        };
        Self { options, colors }
    }

    fn print(&self, errors: &EnvErrors, writer: &mut dyn Write) {
        let c = &self.colors;

        writeln!(
            writer,
            "\n{}Environment validation failed ({}):{}\n",
            c.error,
            errors.len(),
            c.reset
        )
        .ok();

        if self.options.group_by_kind {
            self.print_grouped(errors, writer);
        } else {
            self.print_flat(errors, writer);
        }

        if self.options.show_suggestions {
            self.print_suggestions(errors, writer);
        }
    }

    fn print_grouped(&self, errors: &EnvErrors, writer: &mut dyn Write) {
        let c = &self.colors;
        let mut shown = 0;

        for kind in [IssueKind::Missing, IssueKind::InvalidSchema, IssueKind::InvalidValue] {
            let issues = errors.of_kind(kind);
            if issues.is_empty() {
                continue;
            }
            writeln!(writer, "  {}{}:{}", c.info, heading(kind), c.reset).ok();

            for issue in issues {
                if self.truncated(errors.len(), shown, writer) {
                    return;
                }
                self.print_issue(issue, writer);
                shown += 1;
            }
            writeln!(writer).ok();
        }
    }

    fn print_flat(&self, errors: &EnvErrors, writer: &mut dyn Write) {
        for (shown, issue) in errors.iter().enumerate() {
            if self.truncated(errors.len(), shown, writer) {
                return;
            }
            self.print_issue(issue, writer);
        }
        writeln!(writer).ok();
    }

    /// Prints the "...and N more" trailer once the limit is hit.
    fn truncated(&self, total: usize, shown: usize, writer: &mut dyn Write) -> bool {
        let c = &self.colors;
        match self.options.max_errors {
            Some(max) if shown >= max => {
                writeln!(
                    writer,
                    "\n  {}...and {} more errors{}\n",
                    c.warning,
                    total - shown,
                    c.reset
                )
                .ok();
                true
            }
            _ => false,
        }
    }

    fn print_issue(&self, issue: &Issue, writer: &mut dyn Write) {
        let c = &self.colors;
        writeln!(
            writer,
            "    {}•{} {}{}{}: {}",
            c.error,
            c.reset,
            c.key,
            issue.key,
            c.reset,
            self.message_for(issue)
        )
        .ok();
    }

    fn print_suggestions(&self, errors: &EnvErrors, writer: &mut dyn Write) {
        let c = &self.colors;
        let suggestions: Vec<_> = errors.iter().map(Issue::suggestion).take(3).collect();

        writeln!(writer, "{}Hints:{}", c.hint, c.reset).ok();
        for suggestion in suggestions {
            writeln!(writer, "  • {}", suggestion).ok();
        }
        writeln!(writer).ok();
    }

    fn message_for(&self, issue: &Issue) -> String {
        match &issue.raw {
            Some(raw) if self.options.redact_sensitive && is_sensitive_key(&issue.key) => {
                issue
                    .message
                    .replacen(&format!("\"{raw}\""), "\"[REDACTED]\"", 1)
            }
            _ => issue.message.clone(),
        }
    }
}

fn heading(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::Missing => "Missing",
        IssueKind::InvalidSchema => "Invalid schema",
        IssueKind::InvalidValue => "Invalid value",
    }
}

/// Check if a variable name appears to hold secret data.
fn is_sensitive_key(key: &str) -> bool {
    let sensitive_patterns = ["password", "passwd", "secret", "token", "credential", "key"];
    let lower = key.to_lowercase();
    sensitive_patterns.iter().any(|p| lower.contains(p))
}

fn should_use_color(color_option: ColorOption) -> bool {
    match color_option {
        ColorOption::Always => true,
        ColorOption::Never => false,
        ColorOption::Auto => {
            use std::io::IsTerminal;
            std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
        }
    }
}

impl EnvErrors {
    /// Pretty print issues to stderr.
    pub fn pretty_print(&self, options: &PrettyPrintOptions) {
        let mut stderr = std::io::stderr();
        self.write_pretty(options, &mut stderr);
    }

    /// Pretty print issues to any writer, resolving `Auto` color against stderr.
    pub fn write_pretty(&self, options: &PrettyPrintOptions, writer: &mut dyn Write) {
        let printer = IssuePrinter::new(options, should_use_color(options.color));
        printer.print(self, writer);
    }

    /// Pretty print to a string. `Auto` means no color here.
    pub fn format(&self, options: &PrettyPrintOptions) -> String {
        let use_color = options.color == ColorOption::Always;
        let printer = IssuePrinter::new(options, use_color);
        let mut buf = Vec::new();
        printer.print(self, &mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }

    pub fn pretty_print_default(&self) {
        self.pretty_print(&PrettyPrintOptions::default());
    }
}

/// Extension trait for fail-fast handling of validation results at startup.
pub trait ValidationExt<T> {
    /// Unwrap or pretty print issues and exit with code 1.
    ///
    /// ```ignore
    /// let env = validate_all(&schema, &RealEnv::new()).unwrap_or_exit();
    /// ```
    fn unwrap_or_exit(self) -> T;

    fn unwrap_or_exit_with(self, options: &PrettyPrintOptions) -> T;

    /// Convert to Result, pretty printing on error but not exiting.
    fn unwrap_or_print(self) -> Result<T, EnvErrors>;
}

impl<T> ValidationExt<T> for EnvValidation<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_exit_with(&PrettyPrintOptions::default())
    }

    fn unwrap_or_exit_with(self, options: &PrettyPrintOptions) -> T {
        match self {
            Validation::Success(value) => value,
            Validation::Failure(errors) => {
                errors.pretty_print(options);
                std::process::exit(1);
            }
        }
    }

    fn unwrap_or_print(self) -> Result<T, EnvErrors> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(errors) => {
                errors.pretty_print_default();
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_errors() -> EnvErrors {
        EnvErrors::from_vec(vec![
            Issue::invalid_value("PORT", "abc", "expected number, got \"abc\""),
            Issue::missing("REQ"),
            Issue::invalid_schema("X", "Unsupported type \"madeup\"."),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_contains_header_and_keys() {
        let output = create_test_errors().format(&PrettyPrintOptions::no_color());

        assert!(output.contains("Environment validation failed (3):"));
        assert!(output.contains("PORT"));
        assert!(output.contains("REQ"));
        assert!(output.contains("X"));
    }

    #[test]
    fn test_grouping_by_kind() {
        let output = create_test_errors().format(&PrettyPrintOptions::no_color());

        let missing = output.find("Missing:").unwrap();
        let schema = output.find("Invalid schema:").unwrap();
        let value = output.find("Invalid value:").unwrap();
        assert!(missing < schema && schema < value);
        assert!(output.find("REQ").unwrap() < output.find("PORT: expected").unwrap());
    }

    #[test]
    fn test_flat_output_keeps_issue_order() {
        let options = PrettyPrintOptions::no_color().with_grouping(false);
        let output = create_test_errors().format(&options);

        assert!(!output.contains("Missing:"));
        let port = output.find("• PORT").unwrap();
        let req = output.find("• REQ").unwrap();
        assert!(port < req);
    }

    #[test]
    fn test_redaction_of_sensitive_values() {
        let errors = EnvErrors::single(Issue::invalid_value(
            "API_TOKEN",
            "hunter2",
            "expected json, got \"hunter2\": expected value",
        ));
        let output = errors.format(&PrettyPrintOptions::no_color());

        assert!(!output.contains("hunter2"));
        assert!(output.contains("[REDACTED]"));
    }

    #[test]
    fn test_redaction_leaves_message_text_intact() {
        let issue = Issue::invalid_value("API_KEY", "e", "expected number, got \"e\"");
        let output = EnvErrors::single(issue).format(&PrettyPrintOptions::no_color());

        assert!(output.contains("API_KEY: expected number, got \"[REDACTED]\""));
    }

    #[test]
    fn test_no_redaction_when_disabled() {
        let errors = EnvErrors::single(Issue::invalid_value(
            "DB_PASSWORD",
            "hunter2",
            "expected number, got \"hunter2\"",
        ));
        let output = errors.format(&PrettyPrintOptions::no_color().with_redaction(false));

        assert!(output.contains("hunter2"));
    }

    #[test]
    fn test_truncation_with_max_errors() {
        let issues = (0..5).map(|i| Issue::missing(format!("VAR_{i}"))).collect();
        let errors = EnvErrors::from_vec(issues).unwrap();
        let options = PrettyPrintOptions::no_color().with_max_errors(Some(2));
        let output = errors.format(&options);

        assert!(output.contains("VAR_0"));
        assert!(output.contains("VAR_1"));
        assert!(!output.contains("• VAR_2"));
        assert!(output.contains("...and 3 more errors"));
    }

    #[test]
    fn test_suggestions_shown_and_hidden() {
        let errors = EnvErrors::single(Issue::missing("REQ"));

        let output = errors.format(&PrettyPrintOptions::no_color());
        assert!(output.contains("Hints:"));
        assert!(output.contains("Set 'REQ' in the environment or env file"));

        let output = errors.format(&PrettyPrintOptions::no_color().with_suggestions(false));
        assert!(!output.contains("Hints:"));
    }

    #[test]
    fn test_is_sensitive_key() {
        assert!(is_sensitive_key("DB_PASSWORD"));
        assert!(is_sensitive_key("JWT_SECRET"));
        assert!(is_sensitive_key("GITHUB_TOKEN"));
        assert!(is_sensitive_key("API_KEY"));
        assert!(!is_sensitive_key("PORT"));
        assert!(!is_sensitive_key("DATABASE_URL"));
    }

    #[test]
    fn test_color_option_always() {
        let errors = EnvErrors::single(Issue::missing("REQ"));
        let output = errors.format(&PrettyPrintOptions::default().with_color(ColorOption::Always));
        assert!(output.contains("\x1b["));
    }

    #[test]
    fn test_color_option_never() {
        let errors = EnvErrors::single(Issue::missing("REQ"));
        let output = errors.format(&PrettyPrintOptions::no_color());
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_unwrap_or_print() {
        let ok: EnvValidation<i32> = Validation::Success(1);
        assert_eq!(ok.unwrap_or_print().unwrap(), 1);

        let failed: EnvValidation<i32> = Validation::Failure(create_test_errors());
        assert_eq!(failed.unwrap_or_print().unwrap_err().len(), 3);
    }
}
