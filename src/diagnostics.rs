//! Unified diagnostics for the gilt crate.
//!
//! Every failure mode in the crate is represented by [`GiltError`]: fixture
//! I/O, output mismatches, bad scrub patterns, and command execution failures
//! in the harness and CLI. The type derives `thiserror::Error` for display
//! and source chaining and implements `miette::Diagnostic` by hand so the CLI
//! can render rich reports with stable error codes and help text.
//!
//! Errors are fatal to the operation that produced them. Display messages are
//! self-contained: they name the offending path or command and embed the
//! underlying cause, so the panicking surfaces (`assert_text_eq`,
//! `FixtureDir::load`, and friends) lose nothing by formatting the error into
//! the panic message. The `Result` surfaces return `GiltError` unchanged for
//! the caller to propagate with `?`.

use std::{io, path::PathBuf, process::ExitStatus};

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all gilt failure modes.
#[derive(Debug, Error)]
pub enum GiltError {
    /// Reading an input file outside the fixture directory failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Opening or reading a fixture file failed.
    #[error("failed to read fixture {}: {source}", .path.display())]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Recording a fixture file failed.
    #[error("failed to write fixture {}: {source}", .path.display())]
    FixtureWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A fixture operation that requires a name was given an empty one.
    #[error("fixture name is empty")]
    EmptyName,

    /// Actual output did not match the expected text. `diff` holds the
    /// rendered patch, `subject` names what was compared (usually "output").
    #[error("unexpected {subject}:\n{diff}")]
    Mismatch { subject: String, diff: String },

    /// A scrub pattern failed to compile.
    #[error("invalid scrub pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Spawning or driving a child command failed.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A child command ran but exited unsuccessfully.
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Encoding a machine-readable report failed.
    #[error("failed to encode listing: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The CLI was invoked in a way clap could not reject on its own.
    #[error("{message}")]
    Usage { message: String },
}

impl GiltError {
    fn code_str(&self) -> &'static str {
        match self {
            GiltError::Io { .. } => "gilt::io::read",
            GiltError::FixtureIo { .. } => "gilt::fixture::read",
            GiltError::FixtureWrite { .. } => "gilt::fixture::write",
            GiltError::EmptyName => "gilt::fixture::empty_name",
            GiltError::Mismatch { .. } => "gilt::compare::mismatch",
            GiltError::Pattern { .. } => "gilt::normalize::pattern",
            GiltError::Spawn { .. } => "gilt::command::spawn",
            GiltError::CommandFailed { .. } => "gilt::command::failed",
            GiltError::Encode { .. } => "gilt::report::encode",
            GiltError::Usage { .. } => "gilt::cli::usage",
        }
    }
}

impl Diagnostic for GiltError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let help = match self {
            GiltError::FixtureIo { .. } => Some(
                "create the fixture, or set GILT_UPDATE=1 to record it from the actual output"
                    .to_string(),
            ),
            GiltError::EmptyName => {
                Some("pass a file name relative to the testdata directory".to_string())
            }
            GiltError::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
                Some(format!("stderr:\n{}", stderr.trim_end()))
            }
            _ => None,
        };
        help.map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }
}
