//! Line-level diff between expected and actual text.
//!
//! Wraps a `difference::Changeset` split on newlines. The diff renders two
//! ways: [`Diff::to_patch`] produces plain patch text (` ` context, `-`
//! expected-only, `+` actual-only) for error messages and panics, and
//! [`Diff::write_colored`] renders the same lines to a `termcolor` stream
//! with red/green coloring. When a single changed line was replaced by a
//! single new line, the colored form adds a caret row marking the columns
//! that differ, padded by display width so wide characters stay aligned.

use std::{fmt, io};

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, WriteColor};
use unicode_width::UnicodeWidthChar;

/// An immutable line diff between an expected and an actual string.
#[derive(Debug)]
pub struct Diff {
    hunks: Vec<Difference>,
    distance: i32,
}

impl Diff {
    /// Diff `expected` against `actual` at line granularity.
    pub fn new(expected: &str, actual: &str) -> Self {
        let changeset = Changeset::new(expected, actual, "\n");
        Self {
            hunks: changeset.diffs,
            distance: changeset.distance,
        }
    }

    /// True when the two sides were identical.
    pub fn is_empty(&self) -> bool {
        self.distance == 0
    }

    /// Render as plain patch text, one prefixed line per input line.
    pub fn to_patch(&self) -> String {
        let mut patch = String::new();
        for hunk in &self.hunks {
            let (prefix, text) = match hunk {
                Difference::Same(text) => (' ', text),
                Difference::Rem(text) => ('-', text),
                Difference::Add(text) => ('+', text),
            };
            for line in chunk_lines(text) {
                patch.push(prefix);
                patch.push_str(line);
                patch.push('\n');
            }
        }
        patch
    }

    /// Render with colors: context plain, removals red, additions green.
    /// Single-line replacements get a yellow caret row under the columns
    /// that changed.
    pub fn write_colored<W: WriteColor>(&self, out: &mut W) -> io::Result<()> {
        let mut i = 0;
        while i < self.hunks.len() {
            match (&self.hunks[i], self.hunks.get(i + 1)) {
                (Difference::Rem(removed), Some(Difference::Add(added)))
                    if is_single_line(removed) && is_single_line(added) =>
                {
                    write_lines(out, '-', removed, Some(Color::Red))?;
                    write_lines(out, '+', added, Some(Color::Green))?;
                    if let Some(markers) = marker_row(removed, added) {
                        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
                        writeln!(out, " {}", markers)?;
                        out.reset()?;
                    }
                    i += 2;
                }
                (Difference::Same(text), _) => {
                    write_lines(out, ' ', text, None)?;
                    i += 1;
                }
                (Difference::Rem(text), _) => {
                    write_lines(out, '-', text, Some(Color::Red))?;
                    i += 1;
                }
                (Difference::Add(text), _) => {
                    write_lines(out, '+', text, Some(Color::Green))?;
                    i += 1;
                }
            }
        }
        out.reset()
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_patch())
    }
}

/// A changeset hunk holds its lines joined with `\n`. Split on the separator
/// directly: `str::lines` drops trailing empty segments, which would collapse
/// removed or added blank lines.
fn chunk_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
}

fn is_single_line(text: &str) -> bool {
    !text.contains('\n')
}

fn write_lines<W: WriteColor>(
    out: &mut W,
    prefix: char,
    text: &str,
    color: Option<Color>,
) -> io::Result<()> {
    match color {
        Some(color) => out.set_color(ColorSpec::new().set_fg(Some(color)))?,
        None => out.reset()?,
    }
    for line in chunk_lines(text) {
        writeln!(out, "{}{}", prefix, line)?;
    }
    if color.is_some() {
        out.reset()?;
    }
    Ok(())
}

/// Caret row marking the character positions where the two lines differ,
/// one marker column per display-width column.
fn marker_row(expected: &str, actual: &str) -> Option<String> {
    let expected: Vec<char> = expected.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    let len = expected.len().max(actual.len());
    let mut row = String::new();
    let mut any = false;
    for i in 0..len {
        let e = expected.get(i);
        let a = actual.get(i);
        let width = a.or(e).and_then(|c| c.width()).unwrap_or(1).max(1);
        let mark = if e != a {
            any = true;
            '^'
        } else {
            ' '
        };
        for _ in 0..width {
            row.push(mark);
        }
    }
    if any {
        Some(row)
    } else {
        None
    }
}
