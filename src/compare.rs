//! Comparison of actual output against expected text.
//!
//! The pipeline is: apply normalization to both sides (the default is
//! strict, no normalization), test for equality, and on inequality build a
//! [`Diff`]. Three surfaces wrap it:
//!
//! - [`compare`] / [`compare_with`] return a [`Comparison`] for callers that
//!   want to inspect or render the mismatch themselves.
//! - [`diff_compare`] / [`diff_compare_with`] return `Result`, with the
//!   rendered patch inside [`GiltError::Mismatch`].
//! - [`assert_text_eq`] / [`assert_text_eq_with`] panic with the rendered
//!   patch, failing the calling test at the caller's location.

use crate::{diagnostics::GiltError, diff::Diff, normalize::Normalize};

/// Outcome of a comparison.
#[derive(Debug)]
pub enum Comparison {
    Match,
    Mismatch(Mismatch),
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }
}

/// The two post-normalization sides of a failed comparison and their diff.
#[derive(Debug)]
pub struct Mismatch {
    pub expected: String,
    pub actual: String,
    pub diff: Diff,
}

/// Strict comparison, no normalization.
pub fn compare(actual: &str, expected: &str) -> Comparison {
    compare_with(actual, expected, &Normalize::default())
}

/// Comparison with both sides normalized first.
pub fn compare_with(actual: &str, expected: &str, normalize: &Normalize) -> Comparison {
    let actual = normalize.apply(actual);
    let expected = normalize.apply(expected);
    if actual == expected {
        return Comparison::Match;
    }
    let diff = Diff::new(&expected, &actual);
    Comparison::Mismatch(Mismatch {
        expected,
        actual,
        diff,
    })
}

/// `Result` form of the strict comparison. The `Err` is
/// [`GiltError::Mismatch`] and its message contains the rendered patch.
pub fn diff_compare(actual: &str, expected: &str) -> Result<(), GiltError> {
    diff_compare_with(actual, expected, &Normalize::default())
}

/// `Result` form of the normalized comparison.
pub fn diff_compare_with(
    actual: &str,
    expected: &str,
    normalize: &Normalize,
) -> Result<(), GiltError> {
    match compare_with(actual, expected, normalize) {
        Comparison::Match => Ok(()),
        Comparison::Mismatch(mismatch) => Err(GiltError::Mismatch {
            subject: "output".to_string(),
            diff: mismatch.diff.to_patch(),
        }),
    }
}

/// Fail the calling test when `actual` differs from `expected`, panicking
/// with a line diff of the two.
///
/// ```
/// gilt::assert_text_eq("hello\nworld\n", "hello\nworld\n");
/// ```
#[track_caller]
pub fn assert_text_eq(actual: &str, expected: &str) {
    if let Err(err) = diff_compare(actual, expected) {
        panic!("{err}");
    }
}

/// Like [`assert_text_eq`] with both sides normalized first.
#[track_caller]
pub fn assert_text_eq_with(actual: &str, expected: &str, normalize: &Normalize) {
    if let Err(err) = diff_compare_with(actual, expected, normalize) {
        panic!("{err}");
    }
}
