use packguard_domain::{KindFilter, SymbolResolver, plan_comments};
use packguard_patch::Reconstructor;
use packguard_types::{
    CheckMode, CheckReport, DiffMeta, FailOn, GroupingStrategy, PatchBackend,
    REASON_NO_DOCUMENTS, REASON_RESOLVER_UNAVAILABLE, ViolationDiff, ViolationKind,
};

use crate::engine::ViolationDiffEngine;
use crate::report::{build_report, compute_exit_code};
use crate::root::ProjectRoot;
use crate::source::{ChangeSet, PatchSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPlan {
    pub base: String,
    pub head: String,
    pub max_comments: usize,
    pub grouping: GroupingStrategy,
    /// Kinds to report; `None` means the known kinds.
    pub violation_kinds: Option<Vec<ViolationKind>>,
    pub fail_on: FailOn,
    pub patch_backend: PatchBackend,
    /// Project directory relative to the VCS root.
    pub root_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    pub report: CheckReport,
    /// Full diff after suppression and filtering, before the comment cap.
    pub diff: ViolationDiff,
    pub exit_code: i32,
    /// Number of comment groups dropped by the cap.
    pub truncated_comments: u32,
    pub renamed_symbols: Vec<String>,
    /// Documents whose prior content was recovered best-effort.
    pub reconstruction_failures: Vec<String>,
}

/// Runs the tracking-document check for one change set.
///
/// `before_comment` sees the complete diff and the changed documents before
/// any comment is planned, so aggregate summaries include groups the cap drops.
pub fn run_check(
    plan: &CheckPlan,
    changes: &ChangeSet,
    source: &dyn PatchSource,
    resolver: Option<&dyn SymbolResolver>,
    before_comment: &mut dyn FnMut(&ViolationDiff, &[String]),
) -> Result<CheckRun, anyhow::Error> {
    let documents = changes.documents();
    let mut reasons: Vec<String> = Vec::new();
    if documents.is_empty() {
        reasons.push(REASON_NO_DOCUMENTS.to_string());
    }
    if resolver.is_none() && !changes.renames.is_empty() {
        tracing::warn!(
            renames = changes.renames.len(),
            "no symbol resolver configured; renamed symbols may show up as new violations"
        );
        reasons.push(REASON_RESOLVER_UNAVAILABLE.to_string());
    }

    let mut engine = ViolationDiffEngine::new(source)
        .with_reconstructor(Reconstructor::new(plan.patch_backend))
        .with_root(ProjectRoot::new(plan.root_path.as_deref()))
        .with_filter(KindFilter::from_config(plan.violation_kinds.as_deref()));
    if let Some(resolver) = resolver {
        engine = engine.with_resolver(resolver);
    }
    let outcome = engine.diff(changes)?;

    before_comment(&outcome.diff, &documents);

    let comments = plan_comments(&outcome.diff.added, plan.grouping, plan.max_comments);
    let report = build_report(
        DiffMeta {
            mode: CheckMode::TrackingDocuments,
            base: plan.base.clone(),
            head: plan.head.clone(),
            documents,
        },
        &comments,
        outcome.diff.counts(),
        reasons,
    );
    let exit_code = compute_exit_code(plan.fail_on, report.verdict.comments_emitted);

    Ok(CheckRun {
        report,
        diff: outcome.diff,
        exit_code,
        truncated_comments: comments.truncated,
        renamed_symbols: outcome.renamed_symbols,
        reconstruction_failures: outcome.reconstruction_failures,
    })
}
