//! Handles all user-facing output for the CLI.
//!
//! Centralizes color-choice handling and the message shapes the CLI prints,
//! so every subcommand renders matches and mismatches the same way. Terminal
//! color failures are ignored; the text itself still reaches the stream.

use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{cli::args::ColorMode, diff::Diff};

/// Resolve the user's color preference against whether the stream is a tty.
pub fn color_choice(mode: ColorMode, stream: atty::Stream) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto => {
            if atty::is(stream) {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
    }
}

/// A stdout stream honoring the user's color preference.
pub fn stdout(mode: ColorMode) -> StandardStream {
    StandardStream::stdout(color_choice(mode, atty::Stream::Stdout))
}

/// `---`/`+++` file headers, then the colored diff body.
pub fn print_file_diff(out: &mut StandardStream, expected: &Path, actual: &Path, diff: &Diff) {
    let _ = out.set_color(ColorSpec::new().set_bold(true));
    println!("--- {}", expected.display());
    println!("+++ {}", actual.display());
    let _ = out.reset();
    let _ = diff.write_colored(out);
}

/// FAIL header plus the colored diff for a fixture mismatch.
pub fn print_check_mismatch(out: &mut StandardStream, fixture: &str, diff: &Diff) {
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    print!("FAIL");
    let _ = out.reset();
    println!(": output does not match fixture `{}`", fixture);
    let _ = diff.write_colored(out);
}

/// Green confirmation that output matched its fixture.
pub fn print_check_ok(out: &mut StandardStream, fixture: &str) {
    let _ = out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    print!("ok");
    let _ = out.reset();
    println!(": output matches fixture `{}`", fixture);
}

/// Confirmation that a fixture was recorded.
pub fn print_recorded(fixture: &str, len: usize) {
    println!("recorded fixture `{}` ({} bytes)", fixture, len);
}
