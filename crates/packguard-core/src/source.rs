use std::collections::BTreeMap;

use packguard_types::RenameMapping;

/// Tracking documents touched by a change, as reported by version control.
///
/// All paths are VCS paths. A renamed document appears in `modified` under
/// its new name and in `renames`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    /// Every rename in the change, not only tracking documents.
    pub renames: Vec<RenameMapping>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Changed documents in added, modified, deleted order.
    pub fn documents(&self) -> Vec<String> {
        self.added
            .iter()
            .chain(&self.modified)
            .chain(&self.deleted)
            .cloned()
            .collect()
    }

    /// True when `path` is the new name of a renamed file.
    pub fn is_rename_target(&self, path: &str) -> bool {
        self.renames.iter().any(|r| r.after == path)
    }
}

/// Where the engine reads documents and their patches.
pub trait PatchSource {
    /// Current (head) content of a VCS path; `None` if it does not exist.
    fn current(&self, path: &str) -> anyhow::Result<Option<String>>;

    /// Forward unified diff that produced the current content; `None` if
    /// version control has no patch for the path.
    fn patch_for(&self, path: &str) -> anyhow::Result<Option<String>>;
}

/// A [`PatchSource`] backed by maps, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
    patches: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_patch(mut self, path: &str, patch: &str) -> Self {
        self.patches.insert(path.to_string(), patch.to_string());
        self
    }
}

impl PatchSource for MemorySource {
    fn current(&self, path: &str) -> anyhow::Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn patch_for(&self, path: &str) -> anyhow::Result<Option<String>> {
        Ok(self.patches.get(path).cloned())
    }
}
