//! BDD tests for suppression of violations explained by file renames.

use packguard_testkit::fixtures::documents::{self, REFERENCING_TODO};

use super::test_repo::TestRepo;

const OLD_RB: &str = "packs/referencing/app/old.rb";
const NEW_RB: &str = "packs/referencing/app/new.rb";

fn class_body(name: &str) -> String {
    let mut body = format!("class {name}\n");
    for i in 0..12 {
        body.push_str(&format!("  def step_{i}\n    :step_{i}\n  end\n"));
    }
    body.push_str("end\n");
    body
}

/// Scenario: The referencing file is renamed.
///
/// Given: `Foo` is referenced from `old.rb`
/// When: `old.rb` is renamed to `new.rb` and the document follows
/// Then: No comment is planned for the moved reference
///   And: The receipt notes that symbol renames could not be checked
#[test]
fn given_referencing_file_when_renamed_then_reference_is_not_reported() {
    let old_body = class_body("Old");
    let repo = TestRepo::with_initial_content(&[
        (REFERENCING_TODO, documents::referenced_from_old()),
        (OLD_RB, old_body.as_str()),
    ]);
    repo.move_file(OLD_RB, NEW_RB);
    repo.write_file(REFERENCING_TODO, documents::referenced_from_new());
    let head = repo.commit("rename old.rb");

    let result = repo.run_check(&head);
    result.assert_exit_code(0);

    let receipt = result.parse_receipt();
    assert_eq!(receipt.comment_count(), 0);
    assert_eq!(receipt.reasons(), vec!["resolver_unavailable".to_string()]);
}

/// Scenario: A constant is renamed together with its file.
///
/// Given: `x.rb` references `::Foo`, defined in `app/public/foo.rb`
/// When: The file becomes `renamed.rb` and the document records `::Renamed`
///   And: The autoload directory is configured
/// Then: No comment is planned
#[test]
fn given_load_path_when_symbol_file_renamed_then_new_symbol_is_suppressed() {
    let before = "---\npacks/defining:\n  \"::Foo\":\n    violations:\n    - privacy\n    files:\n    - packs/referencing/app/x.rb\n";
    let after = "---\npacks/defining:\n  \"::Renamed\":\n    violations:\n    - privacy\n    files:\n    - packs/referencing/app/x.rb\n";
    let foo_body = class_body("Foo");
    let repo = TestRepo::with_initial_content(&[
        (REFERENCING_TODO, before),
        ("packs/defining/app/public/foo.rb", foo_body.as_str()),
    ]);
    repo.move_file(
        "packs/defining/app/public/foo.rb",
        "packs/defining/app/public/renamed.rb",
    );
    repo.write_file("packs/defining/app/public/renamed.rb", &class_body("Renamed"));
    repo.write_file(REFERENCING_TODO, after);
    let head = repo.commit("rename Foo");

    let result = repo.run_check_with_args(&head, &["--load-path", "packs/defining/app/public"]);
    result.assert_exit_code(0);

    let receipt = result.parse_receipt();
    assert_eq!(receipt.comment_count(), 0);
    assert!(receipt.reasons().is_empty(), "reasons: {:?}", receipt.reasons());
}

/// Scenario: The same rename without an autoload directory.
///
/// Given: The renamed-constant change set above
/// When: No load path is configured
/// Then: The renamed constant is reported as a new violation
#[test]
fn given_no_load_path_when_symbol_file_renamed_then_new_symbol_is_reported() {
    let before = "---\npacks/defining:\n  \"::Foo\":\n    violations:\n    - privacy\n    files:\n    - packs/referencing/app/x.rb\n";
    let after = "---\npacks/defining:\n  \"::Renamed\":\n    violations:\n    - privacy\n    files:\n    - packs/referencing/app/x.rb\n";
    let foo_body = class_body("Foo");
    let repo = TestRepo::with_initial_content(&[
        (REFERENCING_TODO, before),
        ("packs/defining/app/public/foo.rb", foo_body.as_str()),
    ]);
    repo.move_file(
        "packs/defining/app/public/foo.rb",
        "packs/defining/app/public/renamed.rb",
    );
    repo.write_file("packs/defining/app/public/renamed.rb", &class_body("Renamed"));
    repo.write_file(REFERENCING_TODO, after);
    let head = repo.commit("rename Foo");

    let receipt = repo.run_check(&head).parse_receipt();
    assert_eq!(
        receipt.comment_anchors(),
        vec![(REFERENCING_TODO.to_string(), 7, "Renamed".to_string())]
    );
    assert!(receipt.reasons().contains(&"resolver_unavailable".to_string()));
}

/// Scenario: A tracking document moves with its package.
///
/// Given: A document under `packs/referencing`
/// When: The package directory is renamed
/// Then: The moved document is not diffed and nothing is posted
#[test]
fn given_document_when_moved_then_nothing_is_posted() {
    let repo = TestRepo::with_initial_content(&[(REFERENCING_TODO, documents::bar_two_files())]);
    repo.move_file(REFERENCING_TODO, "packs/moved/package_todo.yml");
    let head = repo.commit("move package");

    let result = repo.run_check(&head);
    result.assert_exit_code(0);
    assert_eq!(result.parse_receipt().comment_count(), 0);
}
