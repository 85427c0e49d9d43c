use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_shows_options() {
    let mut cmd = Command::cargo_bin("seatscan").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--orgs-file"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--log-file"))
        .stdout(predicate::str::contains("--delay"));
}

#[test]
fn version_flag() {
    let mut cmd = Command::cargo_bin("seatscan").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seatscan"));
}

#[test]
fn missing_token_fails_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("seatscan").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("GITHUB_PERSONAL_ACCESS_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("personal access token is missing"));

    assert!(!dir.path().join("copilot-seat-analysis.csv").exists());
}
