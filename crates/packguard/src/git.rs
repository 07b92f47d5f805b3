//! Version-control collaborator backed by the `git` CLI.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

use packguard_core::{ChangeSet, PatchSource};
use packguard_domain::DocumentMatcher;
use packguard_types::RenameMapping;

/// Reads tracking documents and their patches for `base...head`.
#[derive(Debug, Clone)]
pub struct GitSource {
    dir: PathBuf,
    base: String,
    head: String,
}

impl GitSource {
    pub fn new(dir: impl Into<PathBuf>, base: &str, head: &str) -> Self {
        Self {
            dir: dir.into(),
            base: base.to_string(),
            head: head.to_string(),
        }
    }

    fn range(&self) -> String {
        format!("{}...{}", self.base, self.head)
    }

    /// Tracking documents touched by the range, plus every rename in it.
    pub fn change_set(&self, matcher: &DocumentMatcher) -> Result<ChangeSet> {
        let range = self.range();
        let out = run_git(
            &self.dir,
            &["diff", "--no-color", "--name-status", "-M", &range],
        )?;
        let changes = parse_name_status(&out, matcher);
        debug!(
            added = changes.added.len(),
            modified = changes.modified.len(),
            deleted = changes.deleted.len(),
            renames = changes.renames.len(),
            "collected changed tracking documents"
        );
        Ok(changes)
    }

    /// Every rename in the range, regardless of file type.
    pub fn renames(&self) -> Result<Vec<RenameMapping>> {
        Ok(self.change_set(&DocumentMatcher::none())?.renames)
    }
}

impl PatchSource for GitSource {
    fn current(&self, path: &str) -> Result<Option<String>> {
        let spec = format!("{}:{}", self.head, path);
        if !object_exists(&self.dir, &spec)? {
            return Ok(None);
        }
        run_git(&self.dir, &["show", &spec]).map(Some)
    }

    fn patch_for(&self, path: &str) -> Result<Option<String>> {
        let range = self.range();
        // Paths come from name-status output, which is relative to the repository root.
        let pathspec = format!(":(top){path}");
        let patch = run_git(
            &self.dir,
            &["diff", "--no-color", "--no-ext-diff", "--unified=3", &range, "--", &pathspec],
        )?;
        Ok((!patch.trim().is_empty()).then_some(patch))
    }
}

/// Parses `git diff --name-status -M` output.
///
/// Renames are recorded for every path; a renamed tracking document is listed
/// as modified under its new name. Copies count as additions.
pub fn parse_name_status(output: &str, matcher: &DocumentMatcher) -> ChangeSet {
    let mut changes = ChangeSet::default();
    for line in output.lines() {
        let mut fields = line.split('\t');
        let Some(status) = fields.next().filter(|s| !s.is_empty()) else {
            continue;
        };
        let paths: Vec<&str> = fields.collect();

        match (status.as_bytes()[0], paths.as_slice()) {
            (b'A', [path]) if matcher.is_match(path) => changes.added.push(path.to_string()),
            (b'M' | b'T', [path]) if matcher.is_match(path) => {
                changes.modified.push(path.to_string())
            }
            (b'D', [path]) if matcher.is_match(path) => changes.deleted.push(path.to_string()),
            (b'R', [before, after]) => {
                changes.renames.push(RenameMapping::new(*before, *after));
                if matcher.is_match(after) {
                    changes.modified.push(after.to_string());
                }
            }
            (b'C', [_, after]) if matcher.is_match(after) => changes.added.push(after.to_string()),
            (b'A' | b'M' | b'T' | b'D' | b'C', _) => {}
            _ => debug!(line = %line, "ignoring unrecognized name-status line"),
        }
    }
    changes
}

/// Whether `<rev>:<path>` names an object; the path is always root-relative.
fn object_exists(dir: &Path, spec: &str) -> Result<bool> {
    let status = Command::new("git")
        .current_dir(dir)
        .args(["cat-file", "-e", spec])
        .output()
        .context("run git cat-file")?
        .status;
    Ok(status.success())
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .with_context(|| format!("run git {}", args.first().copied().unwrap_or_default()))?;

    if !output.status.success() {
        bail!(
            "git {} failed (exit={}): {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
