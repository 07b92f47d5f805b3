use crate::PatchError;
use crate::unified::{FilePatch, Hunk};

/// Text split into lines plus whether the last line was newline-terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Lines {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl Lines {
    fn split(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    fn join(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Undoes `patch` on `current`, returning the content before the patch.
///
/// `None` on either side means the file does not exist there. Hunks are
/// located at their recorded position first, then by searching forward and
/// backward for the exact post-image; there is no fuzzy matching.
pub fn reverse_apply(current: Option<&str>, patch: &FilePatch) -> Result<Option<String>, PatchError> {
    if patch.binary {
        return Err(PatchError::Binary);
    }
    if patch.is_deletion() && current.is_some_and(|c| !c.is_empty()) {
        return Err(PatchError::DeletedFileExists);
    }
    if current.is_none() && !patch.is_deletion() {
        return Err(PatchError::MissingPostImage);
    }

    let mut text = Lines::split(current.unwrap_or_default());
    let mut shift: isize = 0;
    let mut cursor: usize = 0;

    for (index, hunk) in patch.hunks.iter().enumerate() {
        let post: Vec<&str> = hunk.new_side().map(|l| l.text.as_str()).collect();
        let pre: Vec<String> = hunk.old_side().map(|l| l.text.clone()).collect();

        let expected = expected_position(hunk, shift);
        let pos = locate(&text.lines, &post, expected, cursor).ok_or(PatchError::HunkMismatch {
            hunk: index + 1,
            new_start: hunk.new_start,
        })?;

        let pre_len = pre.len();
        text.lines.splice(pos..pos + post.len(), pre);
        cursor = pos + pre_len;
        shift += pre_len as isize - post.len() as isize;

        if hunk.old_ends_without_newline() {
            text.trailing_newline = false;
        } else if hunk.new_ends_without_newline() {
            text.trailing_newline = true;
        }
    }

    if patch.is_creation() {
        if !text.lines.is_empty() {
            tracing::debug!(
                remaining = text.lines.len(),
                "reversed creation left content behind"
            );
        }
        return Ok(None);
    }
    Ok(Some(text.join()))
}

/// 0-based index in the partially reversed text where the hunk's post-image
/// should start. A zero-length post-image sits after line `new_start`.
fn expected_position(hunk: &Hunk, shift: isize) -> usize {
    let base = if hunk.new_count == 0 {
        hunk.new_start as isize
    } else {
        hunk.new_start as isize - 1
    };
    (base + shift).max(0) as usize
}

fn locate(lines: &[String], post: &[&str], expected: usize, cursor: usize) -> Option<usize> {
    let last_start = lines.len().checked_sub(post.len())?;
    let expected = expected.clamp(cursor, last_start.max(cursor));

    if post.is_empty() {
        return (expected <= lines.len()).then_some(expected);
    }

    let matches_at = |start: usize| -> bool {
        start >= cursor
            && start <= last_start
            && lines[start..start + post.len()]
                .iter()
                .zip(post)
                .all(|(have, want)| have == want)
    };

    if matches_at(expected) {
        return Some(expected);
    }
    for delta in 1..=lines.len() {
        if let Some(before) = expected.checked_sub(delta) {
            if matches_at(before) {
                return Some(before);
            }
        }
        let after = expected + delta;
        if matches_at(after) {
            return Some(after);
        }
        if before_exhausted(expected, delta, cursor) && after > last_start {
            break;
        }
    }
    None
}

fn before_exhausted(expected: usize, delta: usize, cursor: usize) -> bool {
    expected.checked_sub(delta).is_none_or(|b| b < cursor)
}
