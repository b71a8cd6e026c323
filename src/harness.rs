//! Code-driven golden-case runner.
//!
//! The harness runs a list of [`GoldenCase`]s against a [`FixtureDir`] and
//! reports PASS/FAIL/SKIP lines plus a closing summary, test-runner style.
//! A case's actual output comes either from a precomputed string or from
//! running a command and capturing its stdout. There is no manifest file
//! format: callers build cases in code.
//!
//! Execution phases per case: resolve the actual output, record the fixture
//! when blessing, otherwise load the expected fixture and compare. Skip,
//! `only`, and substring filtering are decided up front so skipped cases
//! never execute their source.
//!
//! # Example
//!
//! ```no_run
//! use gilt::harness::{GoldenCase, Harness};
//! use gilt::FixtureDir;
//!
//! let summary = Harness::new(FixtureDir::new())
//!     .case(GoldenCase::command("help text", "help.golden", "mytool", &["--help"]))
//!     .case(GoldenCase::text("version header", "version.golden", "mytool 1.2.0\n"))
//!     .run();
//! assert!(summary.ok());
//! ```

use std::{
    io::{self, Write},
    process::{Command, Stdio},
};

use crate::{
    compare::{self, Comparison},
    diagnostics::GiltError,
    diff::Diff,
    fixture::{update_requested, FixtureDir},
    normalize::Normalize,
};

// =============================================================================
// CORE TYPES
// =============================================================================

/// Where a case's actual output comes from.
#[derive(Debug, Clone)]
pub enum CaseSource {
    /// Output computed by the caller.
    Text(String),
    /// Run the program and capture its stdout. A non-zero exit is an error,
    /// not a mismatch.
    Command {
        program: String,
        args: Vec<String>,
        stdin: Option<String>,
    },
}

/// A single golden comparison: a named source of actual output and the
/// fixture holding its expected output. An empty fixture name means the
/// output is expected to be empty.
#[derive(Debug, Clone)]
pub struct GoldenCase {
    pub name: String,
    pub fixture: String,
    pub source: CaseSource,
    pub normalize: Option<Normalize>,
    pub skip: bool,
    pub only: bool,
}

impl GoldenCase {
    /// A case whose actual output the caller already has.
    pub fn text(name: &str, fixture: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            fixture: fixture.to_string(),
            source: CaseSource::Text(output.to_string()),
            normalize: None,
            skip: false,
            only: false,
        }
    }

    /// A case that runs `program` and compares its stdout.
    pub fn command(name: &str, fixture: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fixture: fixture.to_string(),
            source: CaseSource::Command {
                program: program.to_string(),
                args: args.iter().map(|arg| arg.to_string()).collect(),
                stdin: None,
            },
            normalize: None,
            skip: false,
            only: false,
        }
    }

    /// Feed the command this stdin. No effect on text cases.
    pub fn with_stdin(mut self, input: &str) -> Self {
        if let CaseSource::Command { stdin, .. } = &mut self.source {
            *stdin = Some(input.to_string());
        }
        self
    }

    /// Normalize this case with `normalize` instead of the harness default.
    pub fn normalized(mut self, normalize: Normalize) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// When any case is marked `only`, unmarked cases are skipped.
    pub fn only(mut self) -> Self {
        self.only = true;
        self
    }
}

/// The result of running one case.
#[derive(Debug)]
pub enum CaseOutcome {
    Pass {
        name: String,
    },
    Mismatch {
        name: String,
        fixture: String,
        diff: Diff,
    },
    Error {
        name: String,
        error: GiltError,
    },
    Skipped {
        name: String,
        reason: String,
    },
}

/// Configuration for harness execution and reporting.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub use_colors: bool,
    /// Record fixtures from actual output instead of comparing. Defaults to
    /// [`update_requested`].
    pub bless: bool,
    /// Case-insensitive substring filter on case names.
    pub filter: Option<String>,
    /// Normalization for cases without their own.
    pub normalize: Normalize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            bless: update_requested(),
            filter: None,
            normalize: Normalize::default(),
        }
    }
}

// Color constants for terminal output
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

impl HarnessConfig {
    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

/// Runs golden cases against a fixture directory.
pub struct Harness {
    dir: FixtureDir,
    config: HarnessConfig,
    cases: Vec<GoldenCase>,
}

impl Harness {
    pub fn new(dir: FixtureDir) -> Self {
        Self::with_config(dir, HarnessConfig::default())
    }

    pub fn with_config(dir: FixtureDir, config: HarnessConfig) -> Self {
        Self {
            dir,
            config,
            cases: Vec::new(),
        }
    }

    pub fn case(mut self, case: GoldenCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Run every case and return the raw outcomes without reporting.
    pub fn run_cases(&self) -> Vec<CaseOutcome> {
        let has_only = self.cases.iter().any(|case| case.only);
        self.cases
            .iter()
            .map(|case| {
                if let Some(reason) = skip_reason(case, has_only, self.config.filter.as_deref()) {
                    return CaseOutcome::Skipped {
                        name: case.name.clone(),
                        reason,
                    };
                }
                self.run_case(case)
            })
            .collect()
    }

    /// Run every case, print a report, and return the summary counts.
    pub fn run(&self) -> Summary {
        let outcomes = self.run_cases();
        report(&outcomes, &self.config);
        Summary::of(&outcomes)
    }

    fn run_case(&self, case: &GoldenCase) -> CaseOutcome {
        let actual = match &case.source {
            CaseSource::Text(text) => text.clone(),
            CaseSource::Command {
                program,
                args,
                stdin,
            } => match capture_stdout(program, args, stdin.as_deref()) {
                Ok(output) => output,
                Err(error) => {
                    return CaseOutcome::Error {
                        name: case.name.clone(),
                        error,
                    }
                }
            },
        };

        if self.config.bless && !case.fixture.is_empty() {
            return match self.dir.write(&case.fixture, &actual) {
                Ok(()) => CaseOutcome::Pass {
                    name: case.name.clone(),
                },
                Err(error) => CaseOutcome::Error {
                    name: case.name.clone(),
                    error,
                },
            };
        }

        let expected = match self.dir.read_optional(&case.fixture) {
            Ok(expected) => expected,
            Err(error) => {
                return CaseOutcome::Error {
                    name: case.name.clone(),
                    error,
                }
            }
        };
        let normalize = case.normalize.as_ref().unwrap_or(&self.config.normalize);
        match compare::compare_with(&actual, &expected, normalize) {
            Comparison::Match => CaseOutcome::Pass {
                name: case.name.clone(),
            },
            Comparison::Mismatch(mismatch) => CaseOutcome::Mismatch {
                name: case.name.clone(),
                fixture: case.fixture.clone(),
                diff: mismatch.diff,
            },
        }
    }
}

/// Why a case would be skipped, if it would be.
pub fn skip_reason(case: &GoldenCase, has_only: bool, filter: Option<&str>) -> Option<String> {
    if has_only && !case.only {
        return Some("not marked 'only' in 'only' mode".to_string());
    }
    if case.skip {
        return Some("marked 'skip'".to_string());
    }
    if let Some(filter) = filter {
        if !case.name.to_lowercase().contains(&filter.to_lowercase()) {
            return Some(format!("filtered out by substring: {}", filter));
        }
    }
    None
}

/// Run `program` with `args`, optionally feeding `stdin`, and capture its
/// stdout. A spawn failure or unsuccessful exit is an error; the child's
/// stderr rides along in the error for reporting. A child may exit without
/// draining its stdin; only the exit status decides success.
pub fn capture_stdout(
    program: &str,
    args: &[String],
    stdin: Option<&str>,
) -> Result<String, GiltError> {
    let rendered = render_command(program, args);
    let mut command = Command::new(program);
    command
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
    let mut child = command.spawn().map_err(|source| GiltError::Spawn {
        command: rendered.clone(),
        source,
    })?;
    if let Some(input) = stdin {
        // Handle dropped at the end of the block, closing the pipe.
        if let Some(mut handle) = child.stdin.take() {
            if let Err(source) = handle.write_all(input.as_bytes()) {
                // A child that exits before draining stdin breaks the pipe;
                // the exit status below decides whether that was a failure.
                if source.kind() != io::ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GiltError::Spawn {
                        command: rendered,
                        source,
                    });
                }
            }
        }
    }
    let output = child.wait_with_output().map_err(|source| GiltError::Spawn {
        command: rendered.clone(),
        source,
    })?;
    if !output.status.success() {
        return Err(GiltError::CommandFailed {
            command: rendered,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn render_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

// =============================================================================
// REPORTING
// =============================================================================

/// Pass/fail/skip counts for a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Tally outcomes; mismatches and errors both count as failures.
    pub fn of(outcomes: &[CaseOutcome]) -> Self {
        let passed = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, CaseOutcome::Pass { .. }))
            .count();
        let failed = outcomes
            .iter()
            .filter(|outcome| {
                matches!(
                    outcome,
                    CaseOutcome::Mismatch { .. } | CaseOutcome::Error { .. }
                )
            })
            .count();
        let skipped = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, CaseOutcome::Skipped { .. }))
            .count();
        Self {
            passed,
            failed,
            skipped,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn ok(&self) -> bool {
        self.failed == 0
    }
}

/// Print PASS/FAIL/SKIP lines and a closing summary. Passes and skips go to
/// stdout, failures and their diffs to stderr.
pub fn report(outcomes: &[CaseOutcome], config: &HarnessConfig) {
    for outcome in outcomes {
        match outcome {
            CaseOutcome::Pass { name } => {
                println!("{}: {}", config.colorize("PASS", GREEN), name);
            }
            CaseOutcome::Mismatch { .. } | CaseOutcome::Error { .. } => {
                print_failure(outcome, config);
            }
            CaseOutcome::Skipped { name, reason } => {
                println!("{}: {} ({})", config.colorize("SKIP", YELLOW), name, reason);
            }
        }
    }

    let summary = Summary::of(outcomes);
    println!(
        "\ngolden summary: total {}, {} {}, {} {}, {} {}",
        summary.total(),
        config.colorize("passed", GREEN),
        summary.passed,
        config.colorize("failed", RED),
        summary.failed,
        config.colorize("skipped", YELLOW),
        summary.skipped,
    );
}

/// Print one failing outcome in detail.
pub fn print_failure(outcome: &CaseOutcome, config: &HarnessConfig) {
    match outcome {
        CaseOutcome::Mismatch {
            name,
            fixture,
            diff,
        } => {
            eprintln!("{}: {} [{}]", config.colorize("FAIL", RED), name, fixture);
            print_diff_lines(diff, config);
        }
        CaseOutcome::Error { name, error } => {
            eprintln!("{}: {}", config.colorize("FAIL", RED), name);
            eprintln!("  {}", error);
        }
        _ => {}
    }
}

fn print_diff_lines(diff: &Diff, config: &HarnessConfig) {
    for line in diff.to_patch().lines() {
        let colored = match line.as_bytes().first() {
            Some(b'-') => config.colorize(line, RED),
            Some(b'+') => config.colorize(line, GREEN),
            _ => line.to_string(),
        };
        eprintln!("  {}", colored);
    }
}
