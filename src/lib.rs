pub use crate::compare::{
    assert_text_eq, assert_text_eq_with, compare, compare_with, diff_compare, diff_compare_with,
    Comparison, Mismatch,
};
pub use crate::diagnostics::GiltError;
pub use crate::diff::Diff;
pub use crate::fixture::{FixtureDir, FixtureEntry};
pub use crate::normalize::Normalize;

pub mod cli;
pub mod compare;
pub mod diagnostics;
pub mod diff;
pub mod fixture;
pub mod harness;
pub mod normalize;
