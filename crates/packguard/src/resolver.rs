//! Locates the file that defines a constant by autoload naming convention.

use std::path::PathBuf;

use tracing::debug;

use packguard_domain::SymbolResolver;

/// Maps `::Foo::BarBaz` to `<load_path>/foo/bar_baz.rb`.
///
/// Load paths are project-relative; the first candidate that exists under
/// `project_dir` wins and is returned project-relative.
#[derive(Debug, Clone)]
pub struct ConventionalPathResolver {
    project_dir: PathBuf,
    load_paths: Vec<String>,
}

impl ConventionalPathResolver {
    pub fn new(project_dir: impl Into<PathBuf>, load_paths: Vec<String>) -> Self {
        Self {
            project_dir: project_dir.into(),
            load_paths,
        }
    }
}

impl SymbolResolver for ConventionalPathResolver {
    fn resolve(&self, symbol_name: &str) -> Option<String> {
        let relative = constant_path(symbol_name)?;
        let found = self
            .load_paths
            .iter()
            .map(|root| format!("{}/{relative}", root.trim_end_matches('/')))
            .find(|candidate| self.project_dir.join(candidate).is_file());
        debug!(symbol = symbol_name, found = ?found, "resolved constant");
        found
    }
}

/// `::Foo::BarBaz` becomes `foo/bar_baz.rb`.
pub fn constant_path(symbol_name: &str) -> Option<String> {
    let segments: Vec<String> = symbol_name
        .trim_start_matches("::")
        .split("::")
        .map(underscore)
        .collect();
    if segments.iter().any(String::is_empty) {
        return None;
    }
    Some(format!("{}.rb", segments.join("/")))
}

/// `HTTPClient` becomes `http_client`; `BarBaz2` becomes `bar_baz2`.
fn underscore(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}
