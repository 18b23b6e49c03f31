//! # CLI Tests / 命令行测试
//!
//! These tests run the `fixture-runner` binary end-to-end: listing cases,
//! running suites against the in-process mock, exit codes, report files and
//! the non-interactive `init`.
//!
//! 这些测试端到端运行 `fixture-runner` 二进制文件：列出用例、针对进程内模拟运行套件、
//! 退出码、报告文件以及非交互式 `init`。

mod common;

use assert_cmd::prelude::*;
use common::{MockServer, project_with_suites, write_file};
use predicates::prelude::*;
use std::process::Command;

fn runner() -> Command {
    let mut cmd = Command::cargo_bin("fixture-runner").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// `list` prints every registered case with its signature.
///
/// `list` 打印每个已注册的用例及其签名。
#[test]
fn test_list_shows_cases_and_signatures() {
    runner()
        .args(["--lang", "en", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reqres.get_users"))
        .stdout(predicate::str::contains("(userId: text, expectedStatus: integer)"))
        .stdout(predicate::str::contains("objects.delete_and_verify"));
}

/// Messages follow `--lang`.
///
/// 消息语言跟随 `--lang`。
#[test]
fn test_list_in_chinese() {
    runner()
        .args(["--lang", "zh-CN", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("已注册的测试用例"));
}

/// A missing fixture aborts the run before any case executes.
///
/// 缺失的夹具会在任何用例执行之前中止运行。
#[test]
fn test_missing_fixture_aborts_the_run() {
    let dir = project_with_suites(
        "http://127.0.0.1:1",
        r#"
[[suites]]
name = "get-all"
case = "objects.get_all"
service = "objects"

[[suites]]
name = "create"
case = "objects.create_object"
service = "objects"
fixture = { path = "fixtures/does_not_exist.csv" }
"#,
    );

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fixture not found"))
        .stdout(predicate::str::contains("Run Summary").not());
}

/// A missing config file is reported and fails the process.
///
/// 缺失的配置文件会被报告，并导致进程失败。
#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "run", "--config", "Missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

/// Every row passing gives exit code 0 and writes the requested reports.
///
/// 所有行都通过时退出码为 0，并写入请求的报告。
#[test]
fn test_successful_run_writes_reports() {
    let server = MockServer::start_in_background();
    let dir = project_with_suites(
        &server.base_url(),
        r#"
[[suites]]
name = "objects-create"
case = "objects.create_object"
service = "objects"
fixture = { path = "fixtures/testdata.csv" }

[[suites]]
name = "objects-delete-and-verify"
case = "objects.delete_and_verify"
service = "objects"
"#,
    );
    write_file(
        dir.path(),
        "fixtures/testdata.csv",
        "userId,title\n1,Test Title 1\n2,Test Title 2\n",
    );

    runner()
        .current_dir(dir.path())
        .args([
            "--lang",
            "en",
            "run",
            "--jobs",
            "2",
            "--html",
            "out/report.html",
            "--json",
            "out/report.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 3  Passed: 3  Failed: 0  Errors: 0"))
        .stdout(predicate::str::contains("All invocations passed!"));

    assert!(dir.path().join("out/report.html").is_file());
    let json = std::fs::read_to_string(dir.path().join("out/report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["totals"]["passed"], 3);
}

/// One failing row makes the whole run exit non-zero, while the other rows
/// still run and pass.
///
/// 一个失败的行会使整个运行以非零退出，而其他行仍会运行并通过。
#[test]
fn test_failing_row_fails_the_process() {
    let server = MockServer::start_in_background();
    let dir = project_with_suites(
        &server.base_url(),
        r#"
[[suites]]
name = "reqres-get-users"
case = "reqres.get_users"
service = "reqres"
fixture = { path = "get_users.csv" }
"#,
    );
    write_file(
        dir.path(),
        "get_users.csv",
        "userId,expectedStatus\n2,200\n23,200\n3,abc\n",
    );

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "run"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Total: 3  Passed: 1  Failed: 1  Errors: 1"))
        .stdout(predicate::str::contains("Failure Details"))
        .stdout(predicate::str::contains("cannot parse \"abc\" as integer"))
        .stderr(predicate::str::contains("1 failure(s) and 1 error(s)"));
}

/// `--filter` only runs suites whose name contains the text.
///
/// `--filter` 只运行名称包含该文本的套件。
#[test]
fn test_filter_selects_suites() {
    let server = MockServer::start_in_background();
    let dir = project_with_suites(
        &server.base_url(),
        r#"
[[suites]]
name = "objects-get-all"
case = "objects.get_all"
service = "objects"

[[suites]]
name = "objects-get-invalid-id"
case = "objects.get_invalid_id"
service = "objects"
"#,
    );

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "run", "--filter", "invalid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Filter skipped 1 suite(s); 1 selected."))
        .stdout(predicate::str::contains("Total: 1"));
}

/// `init --non-interactive` scaffolds a runnable configuration.
///
/// `init --non-interactive` 生成一个可运行的配置。
#[test]
fn test_init_non_interactive() {
    let dir = tempfile::tempdir().unwrap();

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "init", "--non-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    assert!(dir.path().join("Suite.toml").is_file());
    assert!(dir.path().join("fixtures/testdata.csv").is_file());
    let config = std::fs::read_to_string(dir.path().join("Suite.toml")).unwrap();
    assert!(config.contains("objects.create_object"));
}

/// Without `--force`, `init --non-interactive` keeps an existing config.
///
/// 不带 `--force` 时，`init --non-interactive` 保留已有的配置。
#[test]
fn test_init_non_interactive_keeps_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "Suite.toml", "# my hand-written suite\n");

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "init", "--non-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("--force"));

    let config = std::fs::read_to_string(dir.path().join("Suite.toml")).unwrap();
    assert_eq!(config, "# my hand-written suite\n");
}

/// `--force` replaces an existing config.
///
/// `--force` 会替换已有的配置。
#[test]
fn test_init_force_replaces_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "Suite.toml", "# my hand-written suite\n");

    runner()
        .current_dir(dir.path())
        .args(["--lang", "en", "init", "--non-interactive", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let config = std::fs::read_to_string(dir.path().join("Suite.toml")).unwrap();
    assert!(config.contains("objects.create_object"));
}

/// Running without a subcommand prints usage and fails.
///
/// 不带子命令运行会打印用法并失败。
#[test]
fn test_no_subcommand_prints_help() {
    runner()
        .args(["--lang", "en"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
