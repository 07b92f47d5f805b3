//! Tests for the `init` and `parse` commands.

use packguard_testkit::fixtures::documents::{self, REFERENCING_TODO};
use predicates::prelude::*;

use super::test_repo::TestRepo;

#[test]
fn init_creates_starter_config_that_check_accepts() {
    let repo = TestRepo::new();

    repo.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created packguard.toml"));

    let content = std::fs::read_to_string(repo.path().join("packguard.toml")).expect("config");
    assert!(content.contains("[defaults]"));

    repo.write_file(REFERENCING_TODO, documents::foo_privacy());
    let head = repo.commit("record Foo");
    let receipt = repo.run_check(&head).parse_receipt();
    assert_eq!(receipt.comment_count(), 1);
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let repo = TestRepo::new();
    repo.write_config("# mine\n");

    repo.command()
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(
        std::fs::read_to_string(repo.path().join("packguard.toml")).expect("config"),
        "# mine\n"
    );

    repo.command().args(["init", "--force"]).assert().success();
    assert_ne!(
        std::fs::read_to_string(repo.path().join("packguard.toml")).expect("config"),
        "# mine\n"
    );
}

#[test]
fn init_writes_custom_output_path() {
    let repo = TestRepo::new();
    repo.command()
        .args(["init", "--output", "config/packguard.toml"])
        .assert()
        .success();
    assert!(repo.path().join("config/packguard.toml").exists());
}

#[test]
fn parse_prints_records_with_anchor_lines() {
    let repo = TestRepo::new();
    repo.write_file(REFERENCING_TODO, documents::bar_two_files());

    let output = repo
        .command()
        .args(["parse", REFERENCING_TODO])
        .output()
        .expect("run packguard");
    assert!(output.status.success());

    let records: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("records are JSON");
    let records = records.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["symbol_name"], "::Bar");
    assert_eq!(records[0]["location"]["line"], 7);
    assert_eq!(records[1]["location"]["line"], 8);
    assert_eq!(records[1]["referencing_file"], "packs/referencing/app/two.rb");
}

#[test]
fn parse_fails_on_missing_file() {
    let repo = TestRepo::new();
    repo.command()
        .args(["parse", "packs/nope/package_todo.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("packs/nope/package_todo.yml"));
}

#[test]
fn help_lists_commands() {
    let repo = TestRepo::new();
    repo.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("offenses"));
}
