use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

impl LineKind {
    fn prefix(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Added => '+',
            LineKind::Removed => '-',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    pub kind: LineKind,
    pub text: String,
    /// Followed by `\ No newline at end of file`.
    pub no_newline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Lines as they read before the change (context + removed).
    pub fn old_side(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != LineKind::Added)
    }

    /// Lines as they read after the change (context + added).
    pub fn new_side(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != LineKind::Removed)
    }

    pub fn old_ends_without_newline(&self) -> bool {
        self.old_side().last().is_some_and(|l| l.no_newline)
    }

    pub fn new_ends_without_newline(&self) -> bool {
        self.new_side().last().is_some_and(|l| l.no_newline)
    }
}

/// The changes to one file.
///
/// Paths are `None` when the side is `/dev/null` or when the patch carried no
/// file headers (bare hunks, as some review APIs return them).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePatch {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub created: bool,
    pub deleted: bool,
    pub binary: bool,
    pub hunks: Vec<Hunk>,
}

impl FilePatch {
    pub fn path(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }

    /// The patch brings the file into existence.
    pub fn is_creation(&self) -> bool {
        self.created
            || (!self.hunks.is_empty()
                && self.hunks.iter().all(|h| h.old_start == 0 && h.old_count == 0))
    }

    /// The patch removes the file.
    pub fn is_deletion(&self) -> bool {
        self.deleted
            || (!self.hunks.is_empty()
                && self.hunks.iter().all(|h| h.new_start == 0 && h.new_count == 0))
    }

    /// Renders the patch in git format for `path`, always ending with a newline.
    pub fn render(&self, path: &str) -> String {
        let old = if self.is_creation() {
            "/dev/null".to_string()
        } else {
            format!("a/{path}")
        };
        let new = if self.is_deletion() {
            "/dev/null".to_string()
        } else {
            format!("b/{path}")
        };

        let mut out = format!("diff --git a/{path} b/{path}\n");
        if self.is_creation() {
            out.push_str("new file mode 100644\n");
        } else if self.is_deletion() {
            out.push_str("deleted file mode 100644\n");
        }
        out.push_str(&format!("--- {old}\n+++ {new}\n"));
        for h in &self.hunks {
            out.push_str(&format!(
                "@@ -{},{} +{},{} @@\n",
                h.old_start, h.old_count, h.new_start, h.new_count
            ));
            for l in &h.lines {
                out.push(l.kind.prefix());
                out.push_str(&l.text);
                out.push('\n');
                if l.no_newline {
                    out.push_str("\\ No newline at end of file\n");
                }
            }
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatchParseError {
    #[error("malformed hunk header: {0}")]
    MalformedHunkHeader(String),

    #[error("hunk '{header}' ended early: expected {expected_old} old and {expected_new} new lines")]
    TruncatedHunk {
        header: String,
        expected_old: u32,
        expected_new: u32,
    },

    #[error("unexpected line inside hunk '{header}': {line}")]
    UnexpectedHunkLine { header: String, line: String },
}

/// Parses a unified diff (git-style or bare hunks) into per-file patches.
pub fn parse_patch(text: &str) -> Result<Vec<FilePatch>, PatchParseError> {
    let mut files: Vec<FilePatch> = Vec::new();
    let mut current: Option<FilePatch> = None;
    let mut open: Option<OpenHunk> = None;

    for raw in text.lines() {
        if let Some(h) = open.as_mut() {
            if h.wants_more() {
                h.push(raw)?;
                continue;
            }
            // Counts satisfied: a trailing marker still belongs to the hunk.
            if raw.starts_with('\\') {
                h.mark_no_newline();
                continue;
            }
            let done = open.take();
            if let (Some(done), Some(file)) = (done, current.as_mut()) {
                file.hunks.push(done.finish());
            }
        }

        if raw.starts_with("diff --git ") {
            if let Some(done) = current.take() {
                files.push(done);
            }
            let (old_path, new_path) = parse_diff_git_line(raw).unwrap_or_default();
            current = Some(FilePatch {
                old_path,
                new_path,
                ..FilePatch::default()
            });
            continue;
        }

        if let Some(rest) = raw.strip_prefix("--- ") {
            let file = start_file_if_needed(&mut files, &mut current);
            file.old_path = header_path(rest);
            if file.old_path.is_none() {
                file.created = true;
            }
            continue;
        }

        if let Some(rest) = raw.strip_prefix("+++ ") {
            let file = start_file_if_needed(&mut files, &mut current);
            file.new_path = header_path(rest);
            if file.new_path.is_none() {
                file.deleted = true;
            }
            continue;
        }

        if raw.starts_with("@@") {
            let header = parse_hunk_header(raw)?;
            if current.is_none() {
                current = Some(FilePatch::default());
            }
            open = Some(OpenHunk::new(raw, header));
            continue;
        }

        let Some(file) = current.as_mut() else {
            continue;
        };
        if raw.starts_with("new file mode") {
            file.created = true;
        } else if raw.starts_with("deleted file mode") {
            file.deleted = true;
        } else if raw.starts_with("Binary files ") || raw.starts_with("GIT binary patch") {
            file.binary = true;
        }
    }

    if let Some(h) = open.take() {
        if h.wants_more() {
            return Err(h.truncated());
        }
        if let Some(file) = current.as_mut() {
            file.hunks.push(h.finish());
        }
    }
    if let Some(done) = current.take() {
        files.push(done);
    }

    Ok(files)
}

/// A file header after hunks (no `diff --git` line in between) starts a new file.
fn start_file_if_needed<'a>(
    files: &mut Vec<FilePatch>,
    current: &'a mut Option<FilePatch>,
) -> &'a mut FilePatch {
    if current.as_ref().is_some_and(|f| !f.hunks.is_empty()) {
        if let Some(done) = current.take() {
            files.push(done);
        }
    }
    current.get_or_insert_with(FilePatch::default)
}

struct OpenHunk {
    raw_header: String,
    hunk: Hunk,
    old_left: u32,
    new_left: u32,
}

impl OpenHunk {
    fn new(raw: &str, header: Hunk) -> Self {
        Self {
            raw_header: raw.to_string(),
            old_left: header.old_count,
            new_left: header.new_count,
            hunk: header,
        }
    }

    fn wants_more(&self) -> bool {
        self.old_left > 0 || self.new_left > 0
    }

    fn push(&mut self, raw: &str) -> Result<(), PatchParseError> {
        if raw.starts_with('\\') {
            self.mark_no_newline();
            return Ok(());
        }

        // Some tools strip the single space from empty context lines.
        let (kind, text) = match raw.as_bytes().first() {
            None => (LineKind::Context, ""),
            Some(b' ') => (LineKind::Context, &raw[1..]),
            Some(b'+') => (LineKind::Added, &raw[1..]),
            Some(b'-') => (LineKind::Removed, &raw[1..]),
            Some(_) => {
                return Err(PatchParseError::UnexpectedHunkLine {
                    header: self.raw_header.clone(),
                    line: raw.to_string(),
                });
            }
        };

        let (old_used, new_used) = match kind {
            LineKind::Context => (1, 1),
            LineKind::Added => (0, 1),
            LineKind::Removed => (1, 0),
        };
        if old_used > self.old_left || new_used > self.new_left {
            return Err(PatchParseError::UnexpectedHunkLine {
                header: self.raw_header.clone(),
                line: raw.to_string(),
            });
        }
        self.old_left -= old_used;
        self.new_left -= new_used;

        self.hunk.lines.push(HunkLine {
            kind,
            text: text.to_string(),
            no_newline: false,
        });
        Ok(())
    }

    fn mark_no_newline(&mut self) {
        if let Some(last) = self.hunk.lines.last_mut() {
            last.no_newline = true;
        }
    }

    fn truncated(&self) -> PatchParseError {
        PatchParseError::TruncatedHunk {
            header: self.raw_header.clone(),
            expected_old: self.hunk.old_count,
            expected_new: self.hunk.new_count,
        }
    }

    fn finish(self) -> Hunk {
        self.hunk
    }
}

fn parse_hunk_header(line: &str) -> Result<Hunk, PatchParseError> {
    // Formats:
    // @@ -1,2 +3,4 @@ optional section
    // @@ -1 +3 @@
    let malformed = || PatchParseError::MalformedHunkHeader(line.to_string());
    let mut parts = line.split_whitespace();
    if parts.next() != Some("@@") {
        return Err(malformed());
    }
    let minus = parts
        .next()
        .and_then(|p| p.strip_prefix('-'))
        .ok_or_else(malformed)?;
    let plus = parts
        .next()
        .and_then(|p| p.strip_prefix('+'))
        .ok_or_else(malformed)?;

    let (old_start, old_count) = parse_range(minus).ok_or_else(malformed)?;
    let (new_start, new_count) = parse_range(plus).ok_or_else(malformed)?;

    Ok(Hunk {
        old_start,
        old_count,
        new_start,
        new_count,
        lines: Vec::new(),
    })
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

fn parse_diff_git_line(line: &str) -> Option<(Option<String>, Option<String>)> {
    // diff --git a/foo b/foo
    let rest = line.strip_prefix("diff --git ")?;
    let mut it = rest.split_whitespace();
    let a = it.next()?;
    let b = it.next()?;
    Some((strip_prefix_path(a), strip_prefix_path(b)))
}

fn header_path(rest: &str) -> Option<String> {
    // --- a/foo\t2024-01-01 ...
    let first = rest.split('\t').next().unwrap_or(rest);
    if first.trim() == "/dev/null" {
        return None;
    }
    strip_prefix_path(first)
}

fn strip_prefix_path(p: &str) -> Option<String> {
    // strips a/ or b/
    let p = p.trim();
    let p = p
        .strip_prefix("a/")
        .or_else(|| p.strip_prefix("b/"))
        .unwrap_or(p);

    let normalized = Path::new(p)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
