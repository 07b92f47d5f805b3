use std::collections::BTreeSet;

use packguard_types::{ViolationDiff, ViolationKind, ViolationRecord};

/// Allow-list of violation kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindFilter {
    allowed: BTreeSet<ViolationKind>,
}

impl Default for KindFilter {
    fn default() -> Self {
        Self::known()
    }
}

impl KindFilter {
    /// Dependency and privacy; kinds a linter invents later stay hidden.
    pub fn known() -> Self {
        Self::new(ViolationKind::known())
    }

    pub fn new(kinds: impl IntoIterator<Item = ViolationKind>) -> Self {
        Self {
            allowed: kinds.into_iter().collect(),
        }
    }

    /// `None` means the caller expressed no preference.
    pub fn from_config(kinds: Option<&[ViolationKind]>) -> Self {
        match kinds {
            Some(kinds) => Self::new(kinds.iter().cloned()),
            None => Self::known(),
        }
    }

    pub fn allows(&self, kind: &ViolationKind) -> bool {
        self.allowed.contains(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &ViolationKind> {
        self.allowed.iter()
    }

    pub fn retain(&self, records: Vec<ViolationRecord>) -> Vec<ViolationRecord> {
        records.into_iter().filter(|r| self.allows(&r.kind)).collect()
    }

    pub fn apply(&self, diff: ViolationDiff) -> ViolationDiff {
        ViolationDiff {
            added: self.retain(diff.added),
            removed: self.retain(diff.removed),
        }
    }
}
