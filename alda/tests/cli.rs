//! Smoke tests for the `alda` executable.

use std::path::PathBuf;

use assert_cmd::Command;
use testresult::TestResult;

fn repo_arg() -> String {
    let repodir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/repo");
    format!("alda-repo={}", repodir.display())
}

#[test]
fn prints_the_sorted_closure() -> TestResult {
    Command::cargo_bin("alda")?
        .args(["--repo", &repo_arg(), "--arch", "x86_64", "dummy-bash"])
        .assert()
        .success()
        .stdout(
            "dummy-bash-4.2.24-2.src\n\
             dummy-bash-4.2.24-2.x86_64\n\
             dummy-bash-debuginfo-4.2.24-2.x86_64\n",
        );
    Ok(())
}

#[test]
fn fails_when_a_request_does_not_resolve() -> TestResult {
    Command::cargo_bin("alda")?
        .args(["--repo", &repo_arg(), "--arch", "x86_64", "dummy-broken"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn rejects_malformed_repo_specifications() -> TestResult {
    Command::cargo_bin("alda")?
        .args(["--repo", "no-equals-sign", "dummy-bash"])
        .assert()
        .failure();
    Ok(())
}
