//! Opt-in text normalization applied to both sides of a comparison.
//!
//! The default [`Normalize`] is the identity: comparisons are strict unless
//! the caller enables an option. Options compose in a fixed order so the
//! result does not depend on the order the builder methods were called:
//! CRLF folding, ANSI stripping, scrubs, JSON reformatting, then trailing
//! whitespace trimming.
//!
//! Scrubs exist to redact volatile output (timings, temp paths, ids) before
//! it reaches a fixture comparison. Replacement strings may use `$1`-style
//! capture group references.

use lazy_static::lazy_static;
use regex::Regex;

use crate::diagnostics::GiltError;

lazy_static! {
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").unwrap();
}

/// A single regex rewrite applied during normalization.
#[derive(Debug, Clone)]
struct Scrub {
    pattern: Regex,
    replacement: String,
}

/// Composable normalization options. `Normalize::default()` changes nothing.
#[derive(Debug, Clone, Default)]
pub struct Normalize {
    crlf: bool,
    trim_trailing: bool,
    strip_ansi: bool,
    json: bool,
    scrubs: Vec<Scrub>,
}

impl Normalize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `\r\n` line endings to `\n`.
    pub fn crlf(mut self) -> Self {
        self.crlf = true;
        self
    }

    /// Trim trailing whitespace from each line and drop trailing blank lines.
    pub fn trim_trailing(mut self) -> Self {
        self.trim_trailing = true;
        self
    }

    /// Remove ANSI escape sequences (colors, cursor movement).
    pub fn strip_ansi(mut self) -> Self {
        self.strip_ansi = true;
        self
    }

    /// Reformat text that parses as JSON into a canonical pretty-printed
    /// form with sorted object keys. Text that does not parse is left alone.
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Add a regex rewrite. Fails with [`GiltError::Pattern`] when the
    /// pattern does not compile.
    pub fn scrub(mut self, pattern: &str, replacement: &str) -> Result<Self, GiltError> {
        let compiled = Regex::new(pattern).map_err(|source| GiltError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.scrubs.push(Scrub {
            pattern: compiled,
            replacement: replacement.to_string(),
        });
        Ok(self)
    }

    /// Apply the enabled options to `text`. Infallible: every fallible step
    /// was resolved at construction time.
    pub fn apply(&self, text: &str) -> String {
        let mut text = text.to_string();
        if self.crlf {
            text = text.replace("\r\n", "\n");
        }
        if self.strip_ansi {
            text = ANSI_ESCAPE.replace_all(&text, "").into_owned();
        }
        for scrub in &self.scrubs {
            text = scrub
                .pattern
                .replace_all(&text, scrub.replacement.as_str())
                .into_owned();
        }
        if self.json {
            text = reformat_json(&text);
        }
        if self.trim_trailing {
            text = trim_trailing(&text);
        }
        text
    }
}

/// Round-trip through `serde_json::Value` for a canonical rendering. The
/// default `Map` is a BTreeMap, so object keys come out sorted.
fn reformat_json(text: &str) -> String {
    let value = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value,
        Err(_) => return text.to_string(),
    };
    match serde_json::to_string_pretty(&value) {
        Ok(pretty) => pretty,
        Err(_) => text.to_string(),
    }
}

fn trim_trailing(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    lines.join("\n").trim_end().to_string()
}
