use anyhow::Context;
use packguard_domain::{KindFilter, SymbolResolver, plan_comments, suppress_renamed_symbols};
use packguard_todo::parse_offense_report;
use packguard_types::{
    CheckMode, DiffMeta, REASON_RESOLVER_UNAVAILABLE, RenameMapping, ViolationDiff,
};

use crate::check::{CheckPlan, CheckRun};
use crate::report::{build_report, compute_exit_code};
use crate::root::ProjectRoot;

/// Runs the linter-offense route: every reported offense is a candidate.
///
/// Offenses whose symbol moved with a rename are dropped before grouping.
/// Offenses inside a renamed file are kept. Locations are reported in VCS
/// terms.
pub fn run_offense_check(
    plan: &CheckPlan,
    offense_json: &str,
    renames: &[RenameMapping],
    resolver: Option<&dyn SymbolResolver>,
    before_comment: &mut dyn FnMut(&ViolationDiff, &[String]),
) -> Result<CheckRun, anyhow::Error> {
    let root = ProjectRoot::new(plan.root_path.as_deref());
    let offenses = parse_offense_report(offense_json).context("parse linter offenses")?;
    tracing::debug!(offenses = offenses.len(), "parsed linter offenses");

    let mut reasons: Vec<String> = Vec::new();
    if resolver.is_none() && !renames.is_empty() {
        reasons.push(REASON_RESOLVER_UNAVAILABLE.to_string());
    }

    let project_renames = root.project_renames(renames);
    let suppressed = suppress_renamed_symbols(offenses, &project_renames, resolver);
    let filter = KindFilter::from_config(plan.violation_kinds.as_deref());
    let mut diff = filter.apply(ViolationDiff {
        added: suppressed.kept,
        removed: Vec::new(),
    });
    for r in &mut diff.added {
        r.location.path = root.to_vcs(&r.location.path);
    }

    before_comment(&diff, &[]);

    let comments = plan_comments(&diff.added, plan.grouping, plan.max_comments);
    let report = build_report(
        DiffMeta {
            mode: CheckMode::LinterOffenses,
            base: plan.base.clone(),
            head: plan.head.clone(),
            documents: Vec::new(),
        },
        &comments,
        diff.counts(),
        reasons,
    );
    let exit_code = compute_exit_code(plan.fail_on, report.verdict.comments_emitted);

    Ok(CheckRun {
        report,
        diff,
        exit_code,
        truncated_comments: comments.truncated,
        renamed_symbols: suppressed.renamed_symbols,
        reconstruction_failures: Vec::new(),
    })
}
