// End-to-end checks of the gilt binary: the diff, check, and list
// subcommands, their exit codes, and the shape of what they print.
//
// Requires: assert_cmd, predicates crates in [dev-dependencies].

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn gilt() -> Command {
    let mut cmd = Command::cargo_bin("gilt").unwrap();
    // Keep the checks strict even if the caller exported recording mode.
    cmd.env_remove("GILT_UPDATE");
    cmd
}

// =============================================================================
// DIFF
// =============================================================================

#[test]
fn diff_of_identical_files_succeeds_silently() {
    let tmp = TempDir::new().unwrap();
    let left = tmp.path().join("left.txt");
    let right = tmp.path().join("right.txt");
    fs::write(&left, "same\n").unwrap();
    fs::write(&right, "same\n").unwrap();

    gilt()
        .arg("diff")
        .arg(&left)
        .arg(&right)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn diff_of_different_files_exits_one_with_patch_lines() {
    let tmp = TempDir::new().unwrap();
    let expected = tmp.path().join("expected.txt");
    let actual = tmp.path().join("actual.txt");
    fs::write(&expected, "alpha\nbeta\n").unwrap();
    fs::write(&actual, "alpha\ngamma\n").unwrap();

    gilt()
        .arg("diff")
        .arg(&expected)
        .arg(&actual)
        .assert()
        .code(1)
        .stdout(
            contains("--- ")
                .and(contains("+++ "))
                .and(contains(" alpha"))
                .and(contains("-beta"))
                .and(contains("+gamma")),
        );
}

#[test]
fn diff_with_missing_file_is_an_operational_error() {
    let tmp = TempDir::new().unwrap();
    let present = tmp.path().join("present.txt");
    fs::write(&present, "x\n").unwrap();

    gilt()
        .arg("diff")
        .arg(tmp.path().join("absent.txt"))
        .arg(&present)
        .assert()
        .code(2)
        .stderr(contains("failed to read"));
}

#[test]
fn diff_respects_normalization_flags() {
    let tmp = TempDir::new().unwrap();
    let expected = tmp.path().join("expected.txt");
    let actual = tmp.path().join("actual.txt");
    fs::write(&expected, "one\ntwo\n").unwrap();
    fs::write(&actual, "one\r\ntwo\r\n").unwrap();

    gilt().arg("diff").arg(&expected).arg(&actual).assert().code(1);
    gilt()
        .arg("diff")
        .arg("--crlf")
        .arg(&expected)
        .arg(&actual)
        .assert()
        .success();
}

#[test]
fn diff_scrub_replaces_volatile_text_on_both_sides() {
    let tmp = TempDir::new().unwrap();
    let expected = tmp.path().join("expected.txt");
    let actual = tmp.path().join("actual.txt");
    fs::write(&expected, "finished in 84ms\n").unwrap();
    fs::write(&actual, "finished in 1371ms\n").unwrap();

    gilt()
        .arg("diff")
        .args(["--scrub", r"\d+ms=TIMEms"])
        .arg(&expected)
        .arg(&actual)
        .assert()
        .success();
}

#[test]
fn diff_rejects_a_malformed_scrub_pattern() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("file.txt");
    fs::write(&file, "x\n").unwrap();

    gilt()
        .arg("diff")
        .args(["--scrub", "[=oops"])
        .arg(&file)
        .arg(&file)
        .assert()
        .code(2)
        .stderr(contains("invalid scrub pattern"));
}

// =============================================================================
// CHECK
// =============================================================================

#[test]
fn check_compares_command_stdout_to_fixture() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("testdata")).unwrap();
    fs::write(tmp.path().join("testdata/out.golden"), "expected text\n").unwrap();

    gilt()
        .current_dir(tmp.path())
        .args(["check", "--fixture", "out.golden", "--"])
        .args(["sh", "-c", "echo expected text"])
        .assert()
        .success()
        .stdout(contains("output matches fixture `out.golden`"));

    gilt()
        .current_dir(tmp.path())
        .args(["check", "--fixture", "out.golden", "--"])
        .args(["sh", "-c", "echo wrong text"])
        .assert()
        .code(1)
        .stdout(
            contains("does not match fixture `out.golden`")
                .and(contains("-expected text"))
                .and(contains("+wrong text")),
        );
}

#[test]
fn check_with_an_explicit_testdata_directory() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("golden");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("ping.golden"), "ping\n").unwrap();

    gilt()
        .arg("check")
        .arg("--testdata")
        .arg(&root)
        .args(["--fixture", "ping.golden", "--"])
        .args(["sh", "-c", "echo ping"])
        .assert()
        .success();
}

#[test]
fn check_bless_records_the_fixture() {
    let tmp = TempDir::new().unwrap();

    gilt()
        .current_dir(tmp.path())
        .args(["check", "--bless", "--fixture", "fresh.golden", "--"])
        .args(["sh", "-c", "echo captured"])
        .assert()
        .success()
        .stdout(contains("recorded fixture `fresh.golden`"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("testdata/fresh.golden")).unwrap(),
        "captured\n"
    );
}

#[test]
fn check_honors_the_update_environment_variable() {
    let tmp = TempDir::new().unwrap();

    gilt()
        .current_dir(tmp.path())
        .env("GILT_UPDATE", "1")
        .args(["check", "--fixture", "env.golden", "--"])
        .args(["sh", "-c", "echo via env"])
        .assert()
        .success()
        .stdout(contains("recorded fixture `env.golden`"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("testdata/env.golden")).unwrap(),
        "via env\n"
    );
}

#[test]
fn check_on_missing_fixture_is_an_operational_error() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("testdata")).unwrap();

    gilt()
        .current_dir(tmp.path())
        .args(["check", "--fixture", "ghost.golden", "--"])
        .args(["sh", "-c", "echo hi"])
        .assert()
        .code(2)
        .stderr(contains("failed to read fixture").and(contains("GILT_UPDATE")));
}

#[test]
fn check_surfaces_a_failing_command() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("testdata")).unwrap();
    fs::write(tmp.path().join("testdata/out.golden"), "x\n").unwrap();

    gilt()
        .current_dir(tmp.path())
        .args(["check", "--fixture", "out.golden", "--"])
        .args(["sh", "-c", "echo broken >&2; exit 7"])
        .assert()
        .code(2)
        .stderr(contains("exited with").and(contains("broken")));
}

#[test]
fn check_requires_a_command_after_the_separator() {
    gilt()
        .args(["check", "--fixture", "out.golden"])
        .assert()
        .code(2);
}

// =============================================================================
// LIST
// =============================================================================

#[test]
fn list_prints_sorted_fixtures_with_digests() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("testdata");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("zeta.golden"), "z\n").unwrap();
    fs::write(root.join("sub/alpha.golden"), "a\n").unwrap();

    let assert = gilt().current_dir(tmp.path()).arg("list").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("sub/alpha.golden"));
    assert!(lines[1].ends_with("zeta.golden"));
    // sha256sum-style lines, digest first.
    assert!(lines[0].starts_with("87428fc522803d31065e7bce3cf03fe475096631e5e07bbd7a0fde60c4cf25c7"));
    assert!(lines[1].starts_with("c865f6c5ab8d1b0bcd383a5e1e3879d22681c96bf462c269b7581d523fbe70ab"));
}

#[test]
fn list_as_json_parses_and_carries_digests() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("testdata");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("only.golden"), "z\n").unwrap();

    let assert = gilt()
        .current_dir(tmp.path())
        .args(["list", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "only.golden");
    assert_eq!(rows[0]["len"], 2);
    assert_eq!(
        rows[0]["sha256"],
        "c865f6c5ab8d1b0bcd383a5e1e3879d22681c96bf462c269b7581d523fbe70ab"
    );
}

#[test]
fn list_of_a_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    gilt()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("failed to read"));
}
