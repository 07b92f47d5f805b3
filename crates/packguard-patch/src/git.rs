use std::path::Path;
use std::process::Command;

use crate::PatchError;

/// Runs `git apply --reverse` for `patch_file` inside `worktree`.
///
/// `worktree` is a scratch directory, never the real checkout. Repository
/// discovery is capped at its parent so an enclosing repository is ignored
/// and git falls back to plain patch semantics.
pub(crate) fn apply_reverse(worktree: &Path, patch_file: &Path) -> Result<(), PatchError> {
    let ceiling = worktree.parent().unwrap_or(worktree);

    let output = Command::new("git")
        .current_dir(worktree)
        .env("GIT_CEILING_DIRECTORIES", ceiling)
        .arg("apply")
        .arg("--reverse")
        .arg("--unidiff-zero")
        .arg("--whitespace=nowarn")
        .arg(patch_file)
        .output()
        .map_err(PatchError::GitSpawn)?;

    if !output.status.success() {
        return Err(PatchError::GitApply {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
