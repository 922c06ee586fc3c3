//! The `check` command-line front end.
//!
//! [`run`] takes its arguments, environment and output streams as parameters
//! so the whole command can be driven from tests with `MockEnv`.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::env::SystemEnv;
use crate::loader::{load_schema, with_env_file, DEFAULT_ENV_FILE};
use crate::pretty::{ColorOption, PrettyPrintOptions};
use crate::validate::validate;

#[derive(Debug, Parser)]
#[command(name = "env-typed-checker")]
#[command(version, about = "Validate environment variables against a typed schema")]
#[command(after_help = "Exit codes:\n  0 = OK, 1 = validation failed, 2 = CLI error")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the environment against a schema
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to schema JSON
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Env file path (default: .env)
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Do not load an env file; use the process environment only
    #[arg(long)]
    pub no_dotenv: bool,

    /// When to color error output
    #[arg(long, value_enum, default_value_t = ColorOption::Auto)]
    pub color: ColorOption,
}

/// Process exit status for the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Outcome {
    Valid = 0,
    Invalid = 1,
    UsageError = 2,
}

impl Outcome {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<Outcome> for std::process::ExitCode {
    fn from(outcome: Outcome) -> Self {
        std::process::ExitCode::from(outcome.code())
    }
}

/// Parse arguments and run the requested command.
///
/// `args` includes the program name, as with `std::env::args_os()`.
pub fn run<I, T>(args: I, env: &dyn SystemEnv, out: &mut dyn Write, err: &mut dyn Write) -> Outcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    write!(out, "{}", e.render()).ok();
                    Outcome::Valid
                }
                _ => {
                    write!(err, "{}", e.render()).ok();
                    Outcome::UsageError
                }
            };
        }
    };

    match cli.command {
        Some(Command::Check(args)) => check(&args, env, out, err),
        None => {
            write!(out, "{}", Cli::command().render_help()).ok();
            Outcome::Valid
        }
    }
}

/// Run `check`: load the schema, layer the env file, validate, report.
pub fn check(
    args: &CheckArgs,
    env: &dyn SystemEnv,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Outcome {
    let schema = match load_schema(&args.schema, env) {
        Ok(schema) => schema,
        Err(e) => {
            writeln!(err, "{}", e).ok();
            return Outcome::UsageError;
        }
    };

    let result = if args.no_dotenv {
        validate(&schema, env)
    } else {
        let path = args
            .env_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
        match with_env_file(&path, env, args.env_file.is_some()) {
            Ok(layered) => validate(&schema, &layered),
            Err(e) => {
                writeln!(err, "{}", e).ok();
                return Outcome::UsageError;
            }
        }
    };

    match result {
        Ok(values) => {
            tracing::info!(keys = values.len(), "environment is valid");
            writeln!(out, "✅ Environment is valid.").ok();
            Outcome::Valid
        }
        Err(errors) => {
            tracing::info!(issues = errors.len(), "environment validation failed");
            let options = PrettyPrintOptions::show_all().with_color(args.color);
            errors.write_pretty(&options, err);
            Outcome::Invalid
        }
    }
}
