use anyhow::Context;
use packguard_domain::{KindFilter, SymbolResolver, diff_records, suppress_renames};
use packguard_patch::Reconstructor;
use packguard_todo::{TodoParseError, parse_tracking_document};
use packguard_types::{ViolationDiff, ViolationRecord};

use crate::root::ProjectRoot;
use crate::source::{ChangeSet, PatchSource};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("tracking document '{path}' is inconsistent: {source}")]
    Document {
        path: String,
        #[source]
        source: TodoParseError,
    },
}

/// Result of diffing one change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutcome {
    pub diff: ViolationDiff,
    /// Symbols dropped from `added` because their definition moved.
    pub renamed_symbols: Vec<String>,
    /// Added records dropped by rename suppression.
    pub suppressed: u32,
    /// Added and removed records dropped by the kind allow-list.
    pub filtered: u32,
    /// Documents whose prior content could only be recovered best-effort.
    pub reconstruction_failures: Vec<String>,
    /// Renamed tracking documents that were not diffed.
    pub skipped_renames: Vec<String>,
}

/// Computes the violations a change set introduces and retires.
///
/// Documents are processed one at a time. Records keep the VCS path of their
/// document as location so comments can be placed directly; referencing files
/// stay project-relative, as the linter writes them.
pub struct ViolationDiffEngine<'a, S: PatchSource + ?Sized> {
    source: &'a S,
    reconstructor: Reconstructor,
    resolver: Option<&'a dyn SymbolResolver>,
    root: ProjectRoot,
    filter: KindFilter,
}

impl<'a, S: PatchSource + ?Sized> ViolationDiffEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            reconstructor: Reconstructor::default(),
            resolver: None,
            root: ProjectRoot::default(),
            filter: KindFilter::default(),
        }
    }

    pub fn with_reconstructor(mut self, reconstructor: Reconstructor) -> Self {
        self.reconstructor = reconstructor;
        self
    }

    pub fn with_resolver(mut self, resolver: &'a dyn SymbolResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_root(mut self, root: ProjectRoot) -> Self {
        self.root = root;
        self
    }

    pub fn with_filter(mut self, filter: KindFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn diff(&self, changes: &ChangeSet) -> anyhow::Result<EngineOutcome> {
        let renames = self.root.project_renames(&changes.renames);
        let mut outcome = EngineOutcome::default();
        let mut added: Vec<ViolationRecord> = Vec::new();
        let mut removed: Vec<ViolationRecord> = Vec::new();

        for path in &changes.added {
            let current = self.current(path)?;
            added.extend(self.parse(path, current.as_deref())?);
        }

        for path in &changes.deleted {
            let before = self.before(path, None, &mut outcome)?;
            removed.extend(self.parse(path, before.as_deref())?);
        }

        for path in &changes.modified {
            if changes.is_rename_target(path) {
                tracing::info!(document = %path, "skipping renamed tracking document");
                outcome.skipped_renames.push(path.clone());
                continue;
            }
            let current = self.current(path)?;
            let head = self.parse(path, current.as_deref())?;
            let before = self.before(path, current.as_deref(), &mut outcome)?;
            let base = self.parse(path, before.as_deref())?;

            let diff = diff_records(&head, base, &renames);
            tracing::debug!(
                document = %path,
                added = diff.added.len(),
                removed = diff.removed.len(),
                "diffed tracking document"
            );
            added.extend(diff.added);
            removed.extend(diff.removed);
        }

        let before_suppression = added.len();
        let suppressed = suppress_renames(added, &renames, self.resolver);
        outcome.suppressed = count(before_suppression - suppressed.kept.len());
        outcome.renamed_symbols = suppressed.renamed_symbols;

        let unfiltered = suppressed.kept.len() + removed.len();
        outcome.diff = self.filter.apply(ViolationDiff {
            added: suppressed.kept,
            removed,
        });
        outcome.filtered =
            count(unfiltered - outcome.diff.added.len() - outcome.diff.removed.len());

        tracing::info!(
            added = outcome.diff.added.len(),
            removed = outcome.diff.removed.len(),
            suppressed = outcome.suppressed,
            filtered = outcome.filtered,
            "violation diff computed"
        );
        Ok(outcome)
    }

    fn current(&self, path: &str) -> anyhow::Result<Option<String>> {
        self.source
            .current(path)
            .with_context(|| format!("read tracking document '{path}'"))
    }

    fn before(
        &self,
        path: &str,
        current: Option<&str>,
        outcome: &mut EngineOutcome,
    ) -> anyhow::Result<Option<String>> {
        let patch = self
            .source
            .patch_for(path)
            .with_context(|| format!("load patch for '{path}'"))?;
        let Some(patch) = patch else {
            tracing::debug!(document = %path, "no patch; treating document as unchanged");
            return Ok(current.map(str::to_string));
        };

        let reconstruction = self.reconstructor.reconstruct_before(path, current, &patch);
        if !reconstruction.is_clean() {
            outcome.reconstruction_failures.push(path.to_string());
        }
        Ok(reconstruction.before)
    }

    /// Parses under the project-relative path, then re-anchors to the VCS path.
    fn parse(&self, vcs_path: &str, content: Option<&str>) -> anyhow::Result<Vec<ViolationRecord>> {
        let project_path = self.root.to_project(vcs_path).unwrap_or_else(|| {
            tracing::warn!(document = %vcs_path, root = %self.root.prefix(), "document outside project root");
            vcs_path.to_string()
        });

        let mut records = parse_tracking_document(&project_path, content).map_err(|source| {
            EngineError::Document {
                path: vcs_path.to_string(),
                source,
            }
        })?;
        for r in &mut records {
            r.location.path = vcs_path.to_string();
        }
        Ok(records)
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
