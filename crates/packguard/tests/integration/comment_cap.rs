//! BDD tests for the comment cap.
//!
//! The cap limits posted comments while the counts still cover every
//! violation.

use packguard_testkit::TodoDocBuilder;
use packguard_testkit::fixtures::documents::REFERENCING_TODO;

use super::test_repo::TestRepo;

/// A document with `n` symbols, each referenced from its own file.
fn many_symbols(n: usize) -> String {
    let names: Vec<String> = (0..n).map(|i| format!("::Thing{i}")).collect();
    let files: Vec<String> = (0..n)
        .map(|i| format!("packs/referencing/app/thing_{i}.rb"))
        .collect();
    let mut pkg = TodoDocBuilder::new().package("packs/defining");
    for (name, file) in names.iter().zip(&files) {
        pkg = pkg.symbol(name, &["privacy"], &[file.as_str()]);
    }
    pkg.done().build()
}

/// Scenario: More new violations than the default cap.
///
/// Given: A repository without tracking documents
/// When: A document with 7 new violations is added
/// Then: 5 comments are planned and 2 are reported as dropped
///   And: All 7 violations are counted
#[test]
fn given_seven_new_violations_when_default_cap_then_five_comments() {
    let repo = TestRepo::new();
    repo.write_file(REFERENCING_TODO, &many_symbols(7));
    let head = repo.commit("seven");

    let result = repo.run_check(&head);
    result
        .assert_exit_code(0)
        .assert_stdout_contains("5 comment(s) planned, 2 dropped by the cap");

    let receipt = result.parse_receipt();
    assert_eq!(receipt.comment_count(), 5);
    assert_eq!(receipt.truncated(), 2);
    assert_eq!(receipt.added("privacy"), 7);
    assert_eq!(receipt.reasons(), vec!["truncated".to_string()]);

    let symbols: Vec<String> = receipt
        .comment_anchors()
        .into_iter()
        .map(|(_, _, symbol)| symbol)
        .collect();
    assert_eq!(symbols, vec!["Thing0", "Thing1", "Thing2", "Thing3", "Thing4"]);
}

/// Scenario: The cap is raised on the command line.
///
/// Given: The same 7 new violations
/// When: Check runs with `--max-comments 10`
/// Then: Every violation gets a comment
#[test]
fn given_seven_new_violations_when_cap_raised_then_all_commented() {
    let repo = TestRepo::new();
    repo.write_file(REFERENCING_TODO, &many_symbols(7));
    let head = repo.commit("seven");

    let result = repo.run_check_with_args(&head, &["--max-comments", "10"]);
    result.assert_exit_code(0);

    let receipt = result.parse_receipt();
    assert_eq!(receipt.comment_count(), 7);
    assert_eq!(receipt.truncated(), 0);
    assert!(receipt.reasons().is_empty());
}

/// Scenario: The pre-comment summary sees everything.
///
/// Given: 7 new violations and the default cap
/// When: Check runs with `--summary`
/// Then: The summary counts all 7 and lists the changed document
#[test]
fn given_cap_when_summary_requested_then_summary_counts_everything() {
    let repo = TestRepo::new();
    repo.write_file(REFERENCING_TODO, &many_symbols(7));
    let head = repo.commit("seven");

    let summary_path = repo.path().join("artifacts/summary.json");
    let summary_arg = summary_path.to_string_lossy().to_string();
    repo.run_check_with_args(&head, &["--summary", &summary_arg])
        .assert_exit_code(0);

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).expect("summary written"))
            .expect("summary is JSON");
    assert_eq!(summary["counts"]["added"]["privacy"], 7);
    assert_eq!(summary["documents"], serde_json::json!([REFERENCING_TODO]));
}
