//! Common test fixtures: tracking documents, offense reports and configs.

/// Tracking document fixtures. Paths are VCS-relative.
pub mod documents {
    pub const REFERENCING_TODO: &str = "packs/referencing/package_todo.yml";

    /// `Foo` referenced from `x.rb` with a privacy violation.
    pub fn foo_privacy() -> &'static str {
        r#"---
packs/defining:
  "::Foo":
    violations:
    - privacy
    files:
    - packs/referencing/app/x.rb
"#
    }

    /// [`foo_privacy`] plus a dependency violation for the same reference.
    pub fn foo_privacy_and_dependency() -> &'static str {
        r#"---
packs/defining:
  "::Foo":
    violations:
    - dependency
    - privacy
    files:
    - packs/referencing/app/x.rb
"#
    }

    /// `Bar` referenced from two files.
    pub fn bar_two_files() -> &'static str {
        r#"---
packs/defining:
  "::Bar":
    violations:
    - dependency
    files:
    - packs/referencing/app/one.rb
    - packs/referencing/app/two.rb
"#
    }

    /// `Foo` referenced from `old.rb`.
    pub fn referenced_from_old() -> &'static str {
        r#"---
packs/defining:
  "::Foo":
    violations:
    - privacy
    files:
    - packs/referencing/app/old.rb
"#
    }

    /// Same as [`referenced_from_old`] after `old.rb` became `new.rb`.
    pub fn referenced_from_new() -> &'static str {
        r#"---
packs/defining:
  "::Foo":
    violations:
    - privacy
    files:
    - packs/referencing/app/new.rb
"#
    }

    /// Two keys where one name is a substring of the other.
    pub fn substring_keys() -> &'static str {
        r#"---
packs/defining:
  "::MyOtherClassThing":
    violations:
    - privacy
    files:
    - packs/referencing/app/x.rb
  "::MyClass":
    violations:
    - privacy
    files:
    - packs/referencing/app/x.rb
"#
    }
}

/// Linter offense reports (`--json` output).
pub mod offenses {
    pub fn privacy_and_dependency() -> &'static str {
        r#"{
  "offenses": [
    {
      "violation_type": "privacy",
      "file": "packs/referencing/app/x.rb",
      "line": 4,
      "column": 6,
      "constant_name": "::Defining::Secret",
      "referencing_pack_name": "packs/referencing",
      "defining_pack_name": "packs/defining",
      "strict": false,
      "message": "Privacy violation"
    },
    {
      "violation_type": "dependency",
      "file": "packs/referencing/app/y.rb",
      "line": 9,
      "column": 2,
      "constant_name": "::Defining::Public",
      "referencing_pack_name": "packs/referencing",
      "defining_pack_name": "packs/defining",
      "strict": false,
      "message": "Dependency violation"
    }
  ]
}"#
    }

    pub fn empty() -> &'static str {
        r#"{"offenses": []}"#
    }
}

/// Configuration files.
pub mod configs {
    pub fn minimal() -> &'static str {
        "[defaults]\n"
    }

    pub fn per_package_grouping() -> &'static str {
        r#"[defaults]
max_comments = 2
grouping = "per_symbol_per_package"
violation_kinds = ["privacy"]
"#
    }
}
