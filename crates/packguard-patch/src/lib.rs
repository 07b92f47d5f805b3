//! Unified diff parsing and prior-content reconstruction.
//!
//! This crate parses `git diff` style unified diffs and reverses them to
//! recover what a tracking document looked like before a change. All reversal
//! happens in a per-call scratch directory.

mod git;
mod reverse;
mod snapshot;
mod unified;

pub use reverse::reverse_apply;
pub use snapshot::{Reconstruction, Reconstructor, ensure_trailing_newline};
pub use unified::{FilePatch, Hunk, HunkLine, LineKind, PatchParseError, parse_patch};

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error(transparent)]
    Parse(#[from] PatchParseError),

    #[error("patch has no section for '{0}'")]
    NoMatchingFile(String),

    #[error("binary patches cannot be reversed")]
    Binary,

    #[error("patch deletes the file but it still has content")]
    DeletedFileExists,

    #[error("patch modifies a file that does not exist")]
    MissingPostImage,

    #[error("hunk #{hunk} (+{new_start}) does not match the current content")]
    HunkMismatch { hunk: usize, new_start: u32 },

    #[error("refusing to reconstruct '{0}' outside the scratch directory")]
    UnsafePath(String),

    #[error("scratch I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run git: {0}")]
    GitSpawn(#[source] std::io::Error),

    #[error("git apply --reverse failed ({status}): {stderr}")]
    GitApply { status: String, stderr: String },
}
