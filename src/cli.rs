//! Command-line entry point for the `gilt` binary.
//!
//! Thin orchestration over the library: each subcommand maps onto the
//! compare, fixture, and harness modules. Exit codes: 0 on success, 1 on a
//! comparison mismatch, 2 on any operational error (rendered through
//! miette).

pub mod args;
pub mod output;

use std::{fs, path::Path, process};

use clap::Parser;
use serde::Serialize;

use crate::{
    compare::{self, Comparison},
    diagnostics::GiltError,
    fixture::{update_requested, FixtureDir},
    harness,
};

use self::args::{ColorMode, GiltArgs, GiltCommand, ListFormat, NormalizeArgs};

/// The main entry point for the CLI.
pub fn run() {
    let args = GiltArgs::parse();
    match execute(&args) {
        Ok(code) => process::exit(code),
        Err(err) => {
            let report = miette::Report::new(err);
            eprintln!("{report:?}");
            process::exit(2);
        }
    }
}

fn execute(args: &GiltArgs) -> Result<i32, GiltError> {
    match &args.command {
        GiltCommand::Diff {
            expected,
            actual,
            normalize,
        } => run_diff(expected, actual, normalize, args.color),
        GiltCommand::Check {
            fixture,
            testdata,
            bless,
            normalize,
            command,
        } => run_check(fixture, testdata, *bless, normalize, command, args.color),
        GiltCommand::List { testdata, format } => run_list(testdata, *format),
    }
}

// ============================================================================
// SUBCOMMANDS
// ============================================================================

fn run_diff(
    expected_path: &Path,
    actual_path: &Path,
    normalize_args: &NormalizeArgs,
    color: ColorMode,
) -> Result<i32, GiltError> {
    let normalize = normalize_args.to_normalize()?;
    let expected = read_input(expected_path)?;
    let actual = read_input(actual_path)?;
    match compare::compare_with(&actual, &expected, &normalize) {
        Comparison::Match => Ok(0),
        Comparison::Mismatch(mismatch) => {
            let mut out = output::stdout(color);
            output::print_file_diff(&mut out, expected_path, actual_path, &mismatch.diff);
            Ok(1)
        }
    }
}

fn run_check(
    fixture_name: &str,
    testdata: &Path,
    bless: bool,
    normalize_args: &NormalizeArgs,
    command: &[String],
    color: ColorMode,
) -> Result<i32, GiltError> {
    let normalize = normalize_args.to_normalize()?;
    let (program, rest) = match command.split_first() {
        Some(split) => split,
        None => {
            return Err(GiltError::Usage {
                message: "no command given after `--`".to_string(),
            })
        }
    };
    let actual = harness::capture_stdout(program, rest, None)?;
    let dir = FixtureDir::at(testdata);

    if bless || update_requested() {
        dir.write(fixture_name, &actual)?;
        output::print_recorded(fixture_name, actual.len());
        return Ok(0);
    }

    let expected = dir.read_optional(fixture_name)?;
    let mut out = output::stdout(color);
    match compare::compare_with(&actual, &expected, &normalize) {
        Comparison::Match => {
            output::print_check_ok(&mut out, fixture_name);
            Ok(0)
        }
        Comparison::Mismatch(mismatch) => {
            output::print_check_mismatch(&mut out, fixture_name, &mismatch.diff);
            Ok(1)
        }
    }
}

#[derive(Serialize)]
struct ListRow {
    name: String,
    len: u64,
    sha256: String,
}

fn run_list(testdata: &Path, format: ListFormat) -> Result<i32, GiltError> {
    fs::metadata(testdata).map_err(|source| GiltError::Io {
        path: testdata.to_path_buf(),
        source,
    })?;
    let dir = FixtureDir::at(testdata);

    let mut rows = Vec::new();
    for entry in dir.entries() {
        let sha256 = dir.digest(&entry.name)?;
        rows.push(ListRow {
            name: entry.name,
            len: entry.len,
            sha256,
        });
    }

    match format {
        ListFormat::Text => {
            for row in &rows {
                println!("{}  {:>8}  {}", row.sha256, row.len, row.name);
            }
        }
        ListFormat::Json => {
            let encoded = serde_json::to_string_pretty(&rows)
                .map_err(|source| GiltError::Encode { source })?;
            println!("{}", encoded);
        }
    }
    Ok(0)
}

// ============================================================================
// HELPERS
// ============================================================================

fn read_input(path: &Path) -> Result<String, GiltError> {
    fs::read_to_string(path).map_err(|source| GiltError::Io {
        path: path.to_path_buf(),
        source,
    })
}
