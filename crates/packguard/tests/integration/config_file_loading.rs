//! BDD tests for configuration file discovery and precedence.

use packguard_testkit::fixtures::{configs, documents};
use packguard_testkit::fixtures::documents::REFERENCING_TODO;

use super::test_repo::TestRepo;

/// Scenario: `packguard.toml` in the working directory is picked up.
///
/// Given: A config that groups per package, reports privacy only and caps at 2
/// When: `Bar` gains a dependency violation and `Foo` a privacy violation
/// Then: Only the privacy violation is commented
#[test]
fn given_discovered_config_when_check_then_config_applies() {
    let repo = TestRepo::new();
    repo.write_config(configs::per_package_grouping());
    repo.write_file(REFERENCING_TODO, documents::foo_privacy());
    repo.write_file("packs/other/package_todo.yml", documents::bar_two_files());
    let head = repo.commit("two documents");

    let receipt = repo.run_check(&head).parse_receipt();
    assert_eq!(receipt.comment_count(), 1);
    assert_eq!(receipt.comment_anchors()[0].2, "Foo");
    assert_eq!(receipt.added("dependency"), 0);
}

/// Scenario: Per-package grouping folds references together.
///
/// Given: A config that groups per package and reports dependency violations
/// When: `Bar` is newly referenced from two files
/// Then: One comment covers both references
#[test]
fn given_per_package_grouping_when_two_references_then_one_comment() {
    let repo = TestRepo::new();
    repo.write_config(
        "[defaults]\ngrouping = \"per_symbol_per_package\"\nviolation_kinds = [\"dependency\"]\n",
    );
    repo.write_file(REFERENCING_TODO, documents::bar_two_files());
    let head = repo.commit("Bar");

    let receipt = repo.run_check(&head).parse_receipt();
    assert_eq!(receipt.comment_count(), 1);
    let comment = &receipt.comments()[0];
    assert_eq!(comment["violations"].as_array().map(Vec::len), Some(2));
    assert_eq!(comment["locations"].as_array().map(Vec::len), Some(2));
}

/// Scenario: Flags override the config file.
///
/// Given: A config that reports privacy only
/// When: Check runs with `--kind dependency`
/// Then: The dependency violation is reported
#[test]
fn given_config_kinds_when_kind_flag_then_flag_wins() {
    let repo = TestRepo::new();
    repo.write_config(configs::per_package_grouping());
    repo.write_file(REFERENCING_TODO, documents::bar_two_files());
    let head = repo.commit("Bar");

    let receipt = repo
        .run_check_with_args(&head, &["--kind", "dependency"])
        .parse_receipt();
    assert_eq!(receipt.comment_count(), 1);
    assert_eq!(receipt.added("dependency"), 2);
}

/// Scenario: An explicit config path with environment references.
///
/// Given: A config at a custom path whose base is `${PACKGUARD_TEST_BASE}`
/// When: Check runs with `--config` and the variable set, without `--base`
/// Then: The base comes from the environment
#[test]
fn given_env_reference_in_config_when_var_set_then_expanded() {
    let repo = TestRepo::new();
    repo.write_file(
        "ci/packguard.toml",
        "[defaults]\nbase = \"${PACKGUARD_TEST_BASE}\"\nhead = \"${PACKGUARD_TEST_HEAD:-HEAD}\"\n",
    );
    repo.write_file(REFERENCING_TODO, documents::foo_privacy());
    repo.commit("record Foo");

    let out = repo.path().join("artifacts/packguard/report.json");
    let output = repo
        .command()
        .env("PACKGUARD_TEST_BASE", &repo.base_sha)
        .env_remove("PACKGUARD_TEST_HEAD")
        .args(["check", "--config", "ci/packguard.toml", "--out"])
        .arg(&out)
        .output()
        .expect("run packguard");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let receipt: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("receipt")).expect("json");
    assert_eq!(receipt["diff"]["base"], repo.base_sha.as_str());
    assert_eq!(receipt["diff"]["head"], "HEAD");
    assert_eq!(receipt["comments"].as_array().map(Vec::len), Some(1));
}

/// Scenario: A config referencing an unset variable.
///
/// Given: A config whose base is `${PACKGUARD_TEST_UNSET}`
/// When: Check runs without the variable
/// Then: The tool fails and names the variable
#[test]
fn given_unset_env_reference_when_check_then_error() {
    let repo = TestRepo::new();
    repo.write_config("[defaults]\nbase = \"${PACKGUARD_TEST_UNSET}\"\n");

    let output = repo
        .command()
        .env_remove("PACKGUARD_TEST_UNSET")
        .args(["check", "--head", "HEAD"])
        .output()
        .expect("run packguard");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("PACKGUARD_TEST_UNSET"));
}
