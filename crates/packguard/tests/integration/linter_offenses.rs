//! BDD tests for the linter offense entry point.

use packguard_testkit::fixtures::offenses;

use super::test_repo::TestRepo;

/// Scenario: Offenses from a report file.
///
/// Given: A linter report with one privacy and one dependency offense
/// When: `packguard offenses` runs on it
/// Then: Each offense is anchored at its source line
#[test]
fn given_offense_report_when_offenses_then_comments_at_source_lines() {
    let repo = TestRepo::new();
    repo.write_file("tmp/offenses.json", offenses::privacy_and_dependency());
    let head = repo.commit("report");

    let result = repo.run_offenses(&head, "tmp/offenses.json", &[]);
    result.assert_exit_code(0);

    let receipt = result.parse_receipt();
    assert_eq!(
        receipt.comment_anchors(),
        vec![
            (
                "packs/referencing/app/x.rb".to_string(),
                4,
                "Defining::Secret".to_string()
            ),
            (
                "packs/referencing/app/y.rb".to_string(),
                9,
                "Defining::Public".to_string()
            ),
        ]
    );
    assert_eq!(receipt.json["diff"]["mode"], "linter_offenses");
}

/// Scenario: A project below the repository root.
///
/// Given: The same report for a project in `rails/`
/// When: `packguard offenses --root-path rails --no-renames` runs
/// Then: Anchors are repository paths
#[test]
fn given_root_path_when_offenses_then_paths_are_repository_relative() {
    let repo = TestRepo::new();
    repo.write_file("offenses.json", offenses::privacy_and_dependency());

    let result = repo.run_offenses(
        &repo.base_sha,
        "offenses.json",
        &["--root-path", "rails", "--no-renames", "--kind", "privacy"],
    );
    result.assert_exit_code(0);

    let receipt = result.parse_receipt();
    assert_eq!(
        receipt.comment_anchors(),
        vec![(
            "rails/packs/referencing/app/x.rb".to_string(),
            4,
            "Defining::Secret".to_string()
        )]
    );
}

/// Scenario: An empty report.
///
/// Given: A report without offenses
/// When: `packguard offenses --fail-on added` runs
/// Then: Nothing is planned and the exit code is 0
#[test]
fn given_empty_report_when_offenses_then_nothing_planned() {
    let repo = TestRepo::new();
    repo.write_file("offenses.json", offenses::empty());

    let result = repo.run_offenses(
        &repo.base_sha,
        "offenses.json",
        &["--no-renames", "--fail-on", "added"],
    );
    result
        .assert_exit_code(0)
        .assert_stdout_contains("0 comment(s) planned");
    assert_eq!(result.parse_receipt().comment_count(), 0);
}

/// Scenario: A report that is not JSON.
///
/// Given: A report file with garbage
/// When: `packguard offenses` runs
/// Then: The tool fails with exit code 1
#[test]
fn given_invalid_report_when_offenses_then_exit_1() {
    let repo = TestRepo::new();
    repo.write_file("offenses.json", "not json");

    repo.run_offenses(&repo.base_sha, "offenses.json", &["--no-renames"])
        .assert_exit_code(1);
}

/// Scenario: The report arrives on stdin.
///
/// Given: A linter report piped to the process
/// When: `packguard offenses --report -` runs
/// Then: The offenses are planned as comments
#[test]
fn given_report_on_stdin_when_offenses_then_read() {
    let repo = TestRepo::new();
    let out = repo.path().join("out/report.json");

    repo.command()
        .args(["offenses", "--report", "-", "--no-renames", "--out"])
        .arg(&out)
        .write_stdin(offenses::privacy_and_dependency())
        .assert()
        .success();

    let receipt: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("receipt")).expect("json");
    assert_eq!(receipt["comments"].as_array().map(Vec::len), Some(2));
}
