use packguard_domain::{CommentGroup, CommentPlan};
use packguard_types::{
    CHECK_SCHEMA_V1, CheckReport, Comment, DiffMeta, FailOn, KindCounts, ToolMeta, Verdict,
    VerdictStatus,
};

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "packguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// One review comment per planned group, anchored at the group's first member.
pub fn render_comments(plan: &CommentPlan) -> Vec<Comment> {
    plan.groups.iter().map(render_comment).collect()
}

fn render_comment(group: &CommentGroup) -> Comment {
    let anchor = group.anchor();
    let first = &group.records()[0];
    Comment {
        path: anchor.path.clone(),
        line: anchor.line,
        symbol: first.display_name().to_string(),
        target_package: group.target_package_name().to_string(),
        kinds: group.kinds(),
        violations: group.records().to_vec(),
        locations: group.locations(),
    }
}

pub(crate) fn build_report(
    diff: DiffMeta,
    plan: &CommentPlan,
    counts: KindCounts,
    mut reasons: Vec<String>,
) -> CheckReport {
    let comments = render_comments(plan);
    let status = if comments.is_empty() {
        VerdictStatus::Pass
    } else {
        VerdictStatus::Warn
    };
    if plan.truncated > 0 {
        reasons.insert(0, packguard_types::REASON_TRUNCATED.to_string());
    }

    CheckReport {
        schema: CHECK_SCHEMA_V1.to_string(),
        tool: tool_meta(),
        diff,
        verdict: Verdict {
            status,
            comments_emitted: u32::try_from(comments.len()).unwrap_or(u32::MAX),
            comments_truncated: plan.truncated,
            reasons,
        },
        comments,
        counts,
    }
}

/// Exit code for a completed run: 0 unless the policy fails on emitted comments.
pub fn compute_exit_code(fail_on: FailOn, comments_emitted: u32) -> i32 {
    match fail_on {
        FailOn::Never => 0,
        FailOn::Added if comments_emitted > 0 => 2,
        FailOn::Added => 0,
    }
}
