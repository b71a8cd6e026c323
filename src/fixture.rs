//! Golden-fixture storage under a `testdata` directory.
//!
//! A [`FixtureDir`] is a handle to a directory of fixture files addressed by
//! relative name. Loading follows the testdata convention:
//!
//! - An empty name stands for "no fixture": [`FixtureDir::read_optional`]
//!   returns an empty string without touching the file system.
//! - Any other name resolves to `<root>/<name>` and is read in full. A
//!   missing or unreadable fixture is an error naming the path and the
//!   underlying cause, never a partial or empty result.
//!
//! Fixtures can also be recorded: [`FixtureDir::check`] compares actual
//! output against a fixture and, when the `GILT_UPDATE` environment variable
//! is set, rewrites the fixture from the actual output instead of failing.
//! The panicking surfaces ([`FixtureDir::load`], [`FixtureDir::assert_matches`])
//! are `#[track_caller]` so a failure points at the calling test.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::{
    compare::{self, Comparison},
    diagnostics::GiltError,
    normalize::Normalize,
};

/// Default fixture root, relative to the working directory.
pub const DEFAULT_ROOT: &str = "testdata";

/// Environment variable that switches fixture checks into recording mode.
/// Any value counts, including an empty one.
pub const UPDATE_ENV: &str = "GILT_UPDATE";

/// True when the current process was asked to record fixtures.
pub fn update_requested() -> bool {
    env::var_os(UPDATE_ENV).is_some()
}

/// One fixture file in a listing: relative name (`/`-separated) and size in
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureEntry {
    pub name: String,
    pub len: u64,
}

/// Handle to a directory of golden fixtures.
#[derive(Debug, Clone)]
pub struct FixtureDir {
    root: PathBuf,
}

impl FixtureDir {
    /// The conventional root: `testdata` under the working directory.
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }

    /// An explicit root. See also [`testdata!`](crate::testdata), which
    /// anchors the root at the calling crate's manifest directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute or relative path of the named fixture.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        !name.is_empty() && self.path_of(name).is_file()
    }

    /// Read the named fixture, treating an empty name as an empty fixture.
    /// The empty-name path performs no file-system access at all.
    pub fn read_optional(&self, name: &str) -> Result<String, GiltError> {
        if name.is_empty() {
            return Ok(String::new());
        }
        self.read_existing(name)
    }

    /// Read the named fixture. An empty name is an error here; use
    /// [`FixtureDir::read_optional`] when the fixture may be absent by
    /// design.
    pub fn read(&self, name: &str) -> Result<String, GiltError> {
        if name.is_empty() {
            return Err(GiltError::EmptyName);
        }
        self.read_existing(name)
    }

    fn read_existing(&self, name: &str) -> Result<String, GiltError> {
        let path = self.path_of(name);
        fs::read_to_string(&path).map_err(|source| GiltError::FixtureIo { path, source })
    }

    /// Panicking form of [`FixtureDir::read_optional`] for use in tests.
    #[track_caller]
    pub fn load_optional(&self, name: &str) -> String {
        match self.read_optional(name) {
            Ok(contents) => contents,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking form of [`FixtureDir::read`] for use in tests.
    #[track_caller]
    pub fn load(&self, name: &str) -> String {
        match self.read(name) {
            Ok(contents) => contents,
            Err(err) => panic!("{err}"),
        }
    }

    /// Write the named fixture, creating parent directories as needed.
    pub fn write(&self, name: &str, contents: &str) -> Result<(), GiltError> {
        if name.is_empty() {
            return Err(GiltError::EmptyName);
        }
        let path = self.path_of(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GiltError::FixtureWrite {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, contents).map_err(|source| GiltError::FixtureWrite { path, source })
    }

    /// Compare `actual` against the named fixture. An empty name means the
    /// output is expected to be empty. When [`update_requested`] the fixture
    /// is rewritten from `actual` instead and the check passes.
    pub fn check(&self, name: &str, actual: &str) -> Result<(), GiltError> {
        self.check_with(name, actual, &Normalize::default())
    }

    /// Like [`FixtureDir::check`] with both sides normalized first.
    pub fn check_with(
        &self,
        name: &str,
        actual: &str,
        normalize: &Normalize,
    ) -> Result<(), GiltError> {
        if update_requested() && !name.is_empty() {
            return self.write(name, actual);
        }
        let expected = self.read_optional(name)?;
        match compare::compare_with(actual, &expected, normalize) {
            Comparison::Match => Ok(()),
            Comparison::Mismatch(mismatch) => Err(GiltError::Mismatch {
                subject: mismatch_subject(name),
                diff: mismatch.diff.to_patch(),
            }),
        }
    }

    /// Panicking form of [`FixtureDir::check`] for use in tests.
    #[track_caller]
    pub fn assert_matches(&self, name: &str, actual: &str) {
        if let Err(err) = self.check(name, actual) {
            panic!("{err}");
        }
    }

    /// Panicking form of [`FixtureDir::check_with`] for use in tests.
    #[track_caller]
    pub fn assert_matches_with(&self, name: &str, actual: &str, normalize: &Normalize) {
        if let Err(err) = self.check_with(name, actual, normalize) {
            panic!("{err}");
        }
    }

    /// Recursive listing of every fixture under the root, sorted by name.
    /// Unreadable entries are skipped.
    pub fn entries(&self) -> Vec<FixtureEntry> {
        let mut entries: Vec<FixtureEntry> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let len = entry.metadata().ok()?.len();
                let rel = entry.path().strip_prefix(&self.root).ok()?;
                let name = rel.to_string_lossy().replace('\\', "/");
                Some(FixtureEntry { name, len })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Lowercase SHA-256 hex digest of the named fixture's bytes.
    pub fn digest(&self, name: &str) -> Result<String, GiltError> {
        if name.is_empty() {
            return Err(GiltError::EmptyName);
        }
        let path = self.path_of(name);
        let bytes = fs::read(&path).map_err(|source| GiltError::FixtureIo { path, source })?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}

fn mismatch_subject(name: &str) -> String {
    if name.is_empty() {
        "output".to_string()
    } else {
        format!("output for fixture `{}`", name)
    }
}

/// Fixture directory anchored at the calling crate's `CARGO_MANIFEST_DIR`,
/// so fixtures resolve no matter which working directory the test runner
/// chose. The optional argument overrides the directory name.
///
/// ```
/// let dir = gilt::testdata!();
/// let none = dir.load_optional("");
/// assert_eq!(none, "");
/// ```
#[macro_export]
macro_rules! testdata {
    () => {
        $crate::FixtureDir::at(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata"))
    };
    ($rel:expr) => {
        $crate::FixtureDir::at(concat!(env!("CARGO_MANIFEST_DIR"), "/", $rel))
    };
}
