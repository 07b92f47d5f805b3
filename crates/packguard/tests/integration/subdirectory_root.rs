//! BDD tests for projects that live below the repository root.

use packguard_testkit::fixtures::documents::{self, REFERENCING_TODO};

use super::test_repo::TestRepo;

fn under_rails(path: &str) -> String {
    format!("rails/{path}")
}

/// Scenario: The project is in `rails/`.
///
/// Given: A tracking document at `rails/packs/referencing/package_todo.yml`
/// When: Check runs with `--root-path rails`
/// Then: The comment is anchored at the repository path of the document
///   And: The referencing file stays project-relative
#[test]
fn given_root_path_when_document_added_then_anchor_uses_repository_path() {
    let repo = TestRepo::new();
    let doc = under_rails(REFERENCING_TODO);
    repo.write_file(&doc, documents::foo_privacy());
    let head = repo.commit("record Foo");

    let receipt = repo
        .run_check_with_args(&head, &["--root-path", "rails"])
        .parse_receipt();
    assert_eq!(receipt.comment_anchors(), vec![(doc, 7, "Foo".to_string())]);
    assert_eq!(
        receipt.comments()[0]["violations"][0]["referencing_file"],
        "packs/referencing/app/x.rb"
    );
}

/// Scenario: A referencing file is renamed inside the project.
///
/// Given: `rails/packs/referencing/app/old.rb` is referenced
/// When: It is renamed to `new.rb` and the document follows
/// Then: The rename is translated to project paths and nothing is posted
#[test]
fn given_root_path_when_referencing_file_renamed_then_suppressed() {
    let old_rb = under_rails("packs/referencing/app/old.rb");
    let new_rb = under_rails("packs/referencing/app/new.rb");
    let doc = under_rails(REFERENCING_TODO);
    let repo = TestRepo::with_initial_content(&[
        (doc.as_str(), documents::referenced_from_old()),
        (old_rb.as_str(), "class Old\n  def call\n    :ok\n  end\nend\n"),
    ]);
    repo.move_file(&old_rb, &new_rb);
    repo.write_file(&doc, documents::referenced_from_new());
    let head = repo.commit("rename old.rb");

    let receipt = repo
        .run_check_with_args(&head, &["--root-path", "./rails/"])
        .parse_receipt();
    assert_eq!(receipt.comment_count(), 0);
}
