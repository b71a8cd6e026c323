//! Defines the command-line arguments and subcommands for the gilt CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{diagnostics::GiltError, fixture, normalize::Normalize};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gilt",
    version,
    about = "Golden-fixture test support: compare program output against recorded fixtures."
)]
pub struct GiltArgs {
    /// When to color output.
    #[arg(long, value_enum, global = true, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: GiltCommand,
}

/// Color behavior for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum GiltCommand {
    /// Compare two text files and print a colored diff on mismatch.
    Diff {
        /// The file holding the expected text.
        #[arg(required = true)]
        expected: PathBuf,
        /// The file holding the actual text.
        #[arg(required = true)]
        actual: PathBuf,
        #[command(flatten)]
        normalize: NormalizeArgs,
    },
    /// Run a command and compare its stdout against a fixture.
    Check {
        /// Fixture name, relative to the fixture directory.
        #[arg(long)]
        fixture: String,
        /// Fixture directory root.
        #[arg(long, default_value = fixture::DEFAULT_ROOT)]
        testdata: PathBuf,
        /// Record the actual output as the fixture instead of comparing.
        #[arg(long)]
        bless: bool,
        #[command(flatten)]
        normalize: NormalizeArgs,
        /// The command to run, after `--`.
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },
    /// List fixtures with their sizes and SHA-256 digests.
    List {
        /// Fixture directory root.
        #[arg(long, default_value = fixture::DEFAULT_ROOT)]
        testdata: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
}

/// Listing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Text,
    Json,
}

/// Normalization flags shared by `diff` and `check`.
#[derive(Debug, Default, Args)]
pub struct NormalizeArgs {
    /// Fold CRLF line endings to LF before comparing.
    #[arg(long)]
    pub crlf: bool,
    /// Trim trailing whitespace and trailing blank lines.
    #[arg(long)]
    pub trim: bool,
    /// Strip ANSI escape sequences.
    #[arg(long)]
    pub strip_ansi: bool,
    /// Reformat sides that parse as JSON before comparing.
    #[arg(long)]
    pub json: bool,
    /// Regex rewrite applied to both sides; omit `=REPLACEMENT` to delete
    /// matches. Repeatable.
    #[arg(long, value_name = "PATTERN=REPLACEMENT")]
    pub scrub: Vec<String>,
}

impl NormalizeArgs {
    /// Build the [`Normalize`] these flags describe. The pattern side of a
    /// scrub is everything before the first `=`.
    pub fn to_normalize(&self) -> Result<Normalize, GiltError> {
        let mut normalize = Normalize::new();
        if self.crlf {
            normalize = normalize.crlf();
        }
        if self.trim {
            normalize = normalize.trim_trailing();
        }
        if self.strip_ansi {
            normalize = normalize.strip_ansi();
        }
        if self.json {
            normalize = normalize.json();
        }
        for raw in &self.scrub {
            let (pattern, replacement) = match raw.split_once('=') {
                Some((pattern, replacement)) => (pattern, replacement),
                None => (raw.as_str(), ""),
            };
            normalize = normalize.scrub(pattern, replacement)?;
        }
        Ok(normalize)
    }
}
