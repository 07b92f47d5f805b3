//! Builder for tracking documents in the layout the boundary linter writes.
//!
//! # Example
//!
//! ```rust
//! use packguard_testkit::todo_builder::TodoDocBuilder;
//!
//! let doc = TodoDocBuilder::new()
//!     .package("packs/b")
//!         .symbol("::Foo", &["privacy"], &["packs/a/x.rb"])
//!         .done()
//!     .build();
//!
//! assert!(doc.contains("  \"::Foo\":\n"));
//! ```

/// Key quoting style for symbol keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    Double,
    Single,
    /// `? "Key"` on its own line, `: violations:` on the next.
    Explicit,
}

#[derive(Debug, Clone)]
struct SymbolEntry {
    name: String,
    kinds: Vec<String>,
    files: Vec<String>,
}

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    symbols: Vec<SymbolEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct TodoDocBuilder {
    header: bool,
    quote: Quote,
    packages: Vec<PackageEntry>,
}

impl TodoDocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends the generated-file comment block the linter writes.
    pub fn with_header(mut self) -> Self {
        self.header = true;
        self
    }

    pub fn quote(mut self, quote: Quote) -> Self {
        self.quote = quote;
        self
    }

    pub fn package(self, name: &str) -> PackageInProgress {
        PackageInProgress {
            doc: self,
            package: PackageEntry {
                name: name.to_string(),
                symbols: Vec::new(),
            },
        }
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        if self.header {
            out.push_str(
                "# This file contains a list of dependencies that are not part of the long term plan for the\n\
                 # package.\n\
                 #\n\
                 # You can regenerate this file using the following command:\n\
                 #\n\
                 # bin/packwerk update-todo\n",
            );
        }
        out.push_str("---\n");
        for p in &self.packages {
            out.push_str(&format!("{}:\n", p.name));
            for s in &p.symbols {
                match self.quote {
                    Quote::Double => out.push_str(&format!("  \"{}\":\n    violations:\n", s.name)),
                    Quote::Single => out.push_str(&format!("  '{}':\n    violations:\n", s.name)),
                    Quote::Explicit => {
                        out.push_str(&format!("  ? \"{}\"\n  : violations:\n", s.name))
                    }
                }
                for k in &s.kinds {
                    out.push_str(&format!("    - {k}\n"));
                }
                out.push_str("    files:\n");
                for f in &s.files {
                    out.push_str(&format!("    - {f}\n"));
                }
            }
        }
        out
    }
}

#[derive(Debug)]
pub struct PackageInProgress {
    doc: TodoDocBuilder,
    package: PackageEntry,
}

impl PackageInProgress {
    pub fn symbol(mut self, name: &str, kinds: &[&str], files: &[&str]) -> Self {
        self.package.symbols.push(SymbolEntry {
            name: name.to_string(),
            kinds: kinds.iter().map(|s| s.to_string()).collect(),
            files: files.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn done(mut self) -> TodoDocBuilder {
        self.doc.packages.push(self.package);
        self.doc
    }
}
