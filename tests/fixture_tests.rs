// Fixture loading semantics: empty names never touch the file system,
// present fixtures load exactly, missing fixtures fail loudly.

use gilt::fixture::update_requested;
use gilt::{FixtureDir, FixtureEntry, GiltError};
use tempfile::TempDir;

#[test]
fn empty_name_loads_empty_without_filesystem_access() {
    // A root that cannot exist, so any read attempt would error out.
    let dir = FixtureDir::at("/nonexistent/gilt-integration-root");
    assert_eq!(dir.read_optional("").unwrap(), "");
    assert_eq!(dir.load_optional(""), "");
}

#[test]
fn existing_fixture_loads_exact_contents() {
    let dir = gilt::testdata!();
    assert_eq!(dir.load("greeting.golden"), "Hello from gilt!\n");
    assert_eq!(
        dir.load_optional("reports/summary.golden"),
        "processed 3 files\n0 warnings\n0 errors\n"
    );
}

#[test]
fn missing_fixture_is_an_error_naming_the_path() {
    let dir = gilt::testdata!();
    let err = dir.read("no-such-fixture.golden").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("failed to read fixture"));
    assert!(message.contains("no-such-fixture.golden"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn read_of_empty_name_is_rejected() {
    let dir = gilt::testdata!();
    assert!(matches!(dir.read(""), Err(GiltError::EmptyName)));
}

#[test]
#[should_panic(expected = "failed to read fixture")]
fn load_panics_on_missing_fixture() {
    gilt::testdata!().load("no-such-fixture.golden");
}

#[test]
fn write_creates_parents_and_round_trips() {
    let tmp = TempDir::new().unwrap();
    let dir = FixtureDir::at(tmp.path());
    dir.write("nested/deep/case.golden", "payload\n").unwrap();
    assert!(dir.exists("nested/deep/case.golden"));
    assert_eq!(dir.load("nested/deep/case.golden"), "payload\n");
}

#[test]
fn write_of_empty_name_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let dir = FixtureDir::at(tmp.path());
    assert!(matches!(dir.write("", "anything"), Err(GiltError::EmptyName)));
}

#[test]
fn entries_are_recursive_and_sorted_by_name() {
    let entries = gilt::testdata!().entries();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"greeting.golden"));
    assert!(names.contains(&"reports/summary.golden"));
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn entries_report_byte_lengths() {
    let entries = gilt::testdata!().entries();
    let greeting = entries
        .iter()
        .find(|e| e.name == "greeting.golden")
        .unwrap();
    assert_eq!(
        greeting,
        &FixtureEntry {
            name: "greeting.golden".to_string(),
            len: 17,
        }
    );
}

#[test]
fn digests_are_content_addressed() {
    let tmp = TempDir::new().unwrap();
    let dir = FixtureDir::at(tmp.path());
    dir.write("a.golden", "same contents\n").unwrap();
    dir.write("b.golden", "same contents\n").unwrap();
    dir.write("c.golden", "different contents\n").unwrap();

    let a = dir.digest("a.golden").unwrap();
    let b = dir.digest("b.golden").unwrap();
    let c = dir.digest("c.golden").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
}

#[test]
fn check_against_fixture_matches_and_mismatches() {
    // Seeded throwaway root: recording mode must never rewrite the
    // checked-in fixtures from a mismatch assertion.
    let tmp = TempDir::new().unwrap();
    let dir = FixtureDir::at(tmp.path());
    dir.write("status.golden", "all good\n").unwrap();
    assert!(dir.check("status.golden", "all good\n").is_ok());

    // With GILT_UPDATE set a mismatch is rewritten, not reported; the
    // strict branch only exists when recording is off.
    if update_requested() {
        return;
    }
    let err = dir.check("status.golden", "all wrong\n").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("unexpected output for fixture `status.golden`"));
    assert!(message.contains("-all good"));
    assert!(message.contains("+all wrong"));
}

#[test]
fn check_with_empty_name_expects_empty_output() {
    let dir = FixtureDir::at("/nonexistent/gilt-integration-root");
    assert!(dir.check("", "").is_ok());
    assert!(dir.check("", "surprise output\n").is_err());
}

#[test]
#[should_panic(expected = "unexpected output")]
fn assert_matches_fails_the_test_on_mismatch() {
    // An empty name is never recorded, so this panics with or without
    // GILT_UPDATE, and the nonexistent root stays untouched.
    FixtureDir::at("/nonexistent/gilt-integration-root").assert_matches("", "surprise output\n");
}
