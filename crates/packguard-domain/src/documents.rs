use globset::{Glob, GlobSet, GlobSetBuilder};

#[derive(Debug, thiserror::Error)]
pub enum DocumentPatternError {
    #[error("invalid tracking document glob '{glob}': {source}")]
    InvalidGlob {
        glob: String,
        source: globset::Error,
    },
}

/// Selects tracking documents among changed paths.
#[derive(Debug, Clone)]
pub struct DocumentMatcher {
    set: GlobSet,
}

impl DocumentMatcher {
    pub fn compile(patterns: &[String]) -> Result<Self, DocumentPatternError> {
        let mut b = GlobSetBuilder::new();
        for glob in patterns {
            let g = Glob::new(glob).map_err(|source| DocumentPatternError::InvalidGlob {
                glob: glob.clone(),
                source,
            })?;
            b.add(g);
        }
        let set = b.build().map_err(|source| DocumentPatternError::InvalidGlob {
            glob: patterns.join(", "),
            source,
        })?;
        Ok(Self { set })
    }

    /// Matches nothing; useful when only renames are wanted.
    pub fn none() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}
