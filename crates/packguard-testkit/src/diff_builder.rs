//! Unified diff builders for constructing test patches.
//!
//! Hunk line counts are derived from the lines added to the builder, so the
//! output is always well-formed. [`forward_patch`] computes a single-hunk
//! patch between two texts, which is what version control hands the
//! reconstructor for a small tracking document.

/// A single file in a diff.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    path: String,
    hunks: Vec<HunkBuilder>,
    is_deleted: bool,
    is_new_file: bool,
}

impl FileBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            hunks: Vec::new(),
            is_deleted: false,
            is_new_file: false,
        }
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn new_file(mut self) -> Self {
        self.is_new_file = true;
        self
    }

    pub fn add_hunk(mut self, hunk: HunkBuilder) -> Self {
        self.hunks.push(hunk);
        self
    }

    pub fn build(&self) -> String {
        let path = &self.path;
        let mut out = format!("diff --git a/{path} b/{path}\n");
        if self.is_new_file {
            out.push_str("new file mode 100644\n");
        }
        if self.is_deleted {
            out.push_str("deleted file mode 100644\n");
        }
        if self.is_new_file {
            out.push_str("--- /dev/null\n");
        } else {
            out.push_str(&format!("--- a/{path}\n"));
        }
        if self.is_deleted {
            out.push_str("+++ /dev/null\n");
        } else {
            out.push_str(&format!("+++ b/{path}\n"));
        }
        for hunk in &self.hunks {
            out.push_str(&hunk.build());
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Context,
    Add,
    Remove,
}

/// One hunk; counts are computed from the lines.
#[derive(Debug, Clone)]
pub struct HunkBuilder {
    old_start: u32,
    new_start: u32,
    lines: Vec<(Mark, String)>,
}

impl HunkBuilder {
    pub fn new(old_start: u32, new_start: u32) -> Self {
        Self {
            old_start,
            new_start,
            lines: Vec::new(),
        }
    }

    pub fn context(mut self, content: &str) -> Self {
        self.lines.push((Mark::Context, content.to_string()));
        self
    }

    pub fn add_line(mut self, content: &str) -> Self {
        self.lines.push((Mark::Add, content.to_string()));
        self
    }

    pub fn remove(mut self, content: &str) -> Self {
        self.lines.push((Mark::Remove, content.to_string()));
        self
    }

    pub fn build(&self) -> String {
        let old_count = self.lines.iter().filter(|(m, _)| *m != Mark::Add).count();
        let new_count = self.lines.iter().filter(|(m, _)| *m != Mark::Remove).count();
        let mut out = format!(
            "@@ -{},{} +{},{} @@\n",
            self.old_start, old_count, self.new_start, new_count
        );
        for (mark, text) in &self.lines {
            let prefix = match mark {
                Mark::Context => ' ',
                Mark::Add => '+',
                Mark::Remove => '-',
            };
            out.push(prefix);
            out.push_str(text);
            out.push('\n');
        }
        out
    }
}

/// Forward patch turning `before` into `after` for `path`.
///
/// `None` means the file does not exist on that side. Produces one hunk that
/// spans everything between the common prefix and suffix, with up to three
/// lines of context. Returns an empty string when the texts are equal.
pub fn forward_patch(path: &str, before: Option<&str>, after: Option<&str>) -> String {
    let old: Vec<&str> = before.map(|t| t.lines().collect()).unwrap_or_default();
    let new: Vec<&str> = after.map(|t| t.lines().collect()).unwrap_or_default();
    if before == after {
        return String::new();
    }

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    const CONTEXT: usize = 3;
    let lead = prefix.min(CONTEXT);
    let trail = suffix.min(CONTEXT);
    let start = prefix - lead;

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];
    let old_count = lead + old_mid.len() + trail;
    let new_count = lead + new_mid.len() + trail;

    let start_of = |count: usize| if count == 0 { start } else { start + 1 };

    let mut file = FileBuilder::new(path);
    if before.is_none() {
        file = file.new_file();
    }
    if after.is_none() {
        file = file.deleted();
    }

    let mut hunk = HunkBuilder::new(start_of(old_count) as u32, start_of(new_count) as u32);
    for l in &old[start..prefix] {
        hunk = hunk.context(l);
    }
    for l in old_mid {
        hunk = hunk.remove(l);
    }
    for l in new_mid {
        hunk = hunk.add_line(l);
    }
    for l in &old[old.len() - suffix..old.len() - suffix + trail] {
        hunk = hunk.context(l);
    }

    file.add_hunk(hunk).build()
}
