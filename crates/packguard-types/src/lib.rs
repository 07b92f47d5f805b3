//! Data types (config + receipts + violation records) for packguard.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.
//! The only behavior here is the identity of a [`ViolationRecord`], which
//! every other crate relies on for set difference.

use std::fmt;
use std::hash::{Hash, Hasher};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Schema Identifiers ─────────────────────────────────────────
pub const CHECK_SCHEMA_V1: &str = "packguard.check.v1";

// ── Frozen Vocabulary ──────────────────────────────────────────
pub const KIND_DEPENDENCY: &str = "dependency";
pub const KIND_PRIVACY: &str = "privacy";

// Reason tokens (snake_case)
pub const REASON_TRUNCATED: &str = "truncated";
pub const REASON_NO_DOCUMENTS: &str = "no_documents";
pub const REASON_RESOLVER_UNAVAILABLE: &str = "resolver_unavailable";

/// Tracking document file names produced by the boundary linter.
pub const PACKAGE_TODO_FILE: &str = "package_todo.yml";
pub const DEPRECATED_REFERENCES_FILE: &str = "deprecated_references.yml";

/// Comment cap for the tracking-document route.
pub const DEFAULT_MAX_COMMENTS: u32 = 5;
/// Comment cap for the route that consumes linter offenses directly.
pub const DEFAULT_OFFENSE_MAX_COMMENTS: u32 = 15;

/// Kind of boundary violation.
///
/// The set of kinds is open: linters may introduce new ones, which are kept
/// verbatim in [`ViolationKind::Other`] and excluded by default filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViolationKind {
    Dependency,
    Privacy,
    Other(String),
}

impl ViolationKind {
    /// The kinds surfaced when the caller does not supply an allow-list.
    pub fn known() -> Vec<ViolationKind> {
        vec![ViolationKind::Dependency, ViolationKind::Privacy]
    }

    pub fn as_str(&self) -> &str {
        match self {
            ViolationKind::Dependency => KIND_DEPENDENCY,
            ViolationKind::Privacy => KIND_PRIVACY,
            ViolationKind::Other(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ViolationKind::Other(_))
    }
}

impl From<&str> for ViolationKind {
    fn from(s: &str) -> Self {
        match s {
            KIND_DEPENDENCY => ViolationKind::Dependency,
            KIND_PRIVACY => ViolationKind::Privacy,
            other => ViolationKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ViolationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            KIND_DEPENDENCY => ViolationKind::Dependency,
            KIND_PRIVACY => ViolationKind::Privacy,
            _ => ViolationKind::Other(s),
        }
    }
}

impl From<ViolationKind> for String {
    fn from(k: ViolationKind) -> Self {
        match k {
            ViolationKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for ViolationKind {
    fn schema_name() -> String {
        "ViolationKind".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

/// A `(document, line)` pair. Line numbers are 1-based.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct Location {
    pub path: String,
    pub line: u32,
}

impl Location {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// Which adapter produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum RecordOrigin {
    /// Parsed from a tracking document; the location points into the document.
    TrackingDocument,
    /// Reported by the linter directly; the location points into source code.
    LinterOffense {
        column: u32,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        message: String,
    },
}

/// One `(symbol, referencing file, kind)` violation.
///
/// Equality and hashing cover `symbol_name`, `referencing_file`,
/// `target_package_name` and `kind` only. The location, origin, strictness
/// and source package do not participate, so reordering a document never
/// manufactures a diff.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ViolationRecord {
    /// Fully-qualified symbol name as written by the linter (may start with `::`).
    pub symbol_name: String,
    pub referencing_file: String,
    pub target_package_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_package_name: Option<String>,
    pub kind: ViolationKind,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strict: bool,
    pub location: Location,
    pub origin: RecordOrigin,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ViolationRecord {
    /// Symbol name without the leading scope qualifier.
    pub fn display_name(&self) -> &str {
        self.symbol_name
            .strip_prefix("::")
            .unwrap_or(&self.symbol_name)
    }

    pub fn is_dependency(&self) -> bool {
        self.kind == ViolationKind::Dependency
    }

    pub fn is_privacy(&self) -> bool {
        self.kind == ViolationKind::Privacy
    }

    /// Same record, referencing `path` instead of the current file.
    pub fn with_referencing_file(&self, path: &str) -> Self {
        Self {
            referencing_file: path.to_string(),
            ..self.clone()
        }
    }
}

impl PartialEq for ViolationRecord {
    fn eq(&self, other: &Self) -> bool {
        self.symbol_name == other.symbol_name
            && self.referencing_file == other.referencing_file
            && self.target_package_name == other.target_package_name
            && self.kind == other.kind
    }
}

impl Eq for ViolationRecord {}

impl Hash for ViolationRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol_name.hash(state);
        self.referencing_file.hash(state);
        self.target_package_name.hash(state);
        self.kind.hash(state);
    }
}

/// A file rename reported by version control for the current change set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RenameMapping {
    pub before: String,
    pub after: String,
}

impl RenameMapping {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Violations introduced and retired by a change set. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ViolationDiff {
    pub added: Vec<ViolationRecord>,
    pub removed: Vec<ViolationRecord>,
}

impl ViolationDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn counts(&self) -> KindCounts {
        KindCounts {
            added: KindTally::from_records(&self.added),
            removed: KindTally::from_records(&self.removed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct KindTally {
    pub dependency: u32,
    pub privacy: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub other: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl KindTally {
    pub fn from_records(records: &[ViolationRecord]) -> Self {
        let mut tally = Self::default();
        for r in records {
            match r.kind {
                ViolationKind::Dependency => tally.dependency = tally.dependency.saturating_add(1),
                ViolationKind::Privacy => tally.privacy = tally.privacy.saturating_add(1),
                ViolationKind::Other(_) => tally.other = tally.other.saturating_add(1),
            }
        }
        tally
    }

    pub fn total(&self) -> u32 {
        self.dependency
            .saturating_add(self.privacy)
            .saturating_add(self.other)
    }
}

/// Added/removed counts partitioned by kind; the payload of the summary hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct KindCounts {
    pub added: KindTally,
    pub removed: KindTally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// One comment per `(symbol, anchor line, referencing file)`.
    #[default]
    PerSymbolPerLocation,
    /// One comment per `(symbol, target package)`; anchored at the first member.
    PerSymbolPerPackage,
}

impl GroupingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupingStrategy::PerSymbolPerLocation => "per_symbol_per_location",
            GroupingStrategy::PerSymbolPerPackage => "per_symbol_per_package",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PatchBackend {
    /// Reverse the patch in-process.
    #[default]
    Builtin,
    /// Shell out to `git apply --reverse`.
    Git,
}

impl PatchBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            PatchBackend::Builtin => "builtin",
            PatchBackend::Git => "git",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailOn {
    #[default]
    Never,
    /// Fail when at least one comment is emitted.
    Added,
}

impl FailOn {
    pub fn as_str(self) -> &'static str {
        match self {
            FailOn::Never => "never",
            FailOn::Added => "added",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// Diff of tracking documents between base and head.
    TrackingDocuments,
    /// Offenses reported by the linter for the changed files.
    LinterOffenses,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiffMeta {
    pub mode: CheckMode,
    pub base: String,
    pub head: String,
    /// Changed tracking documents (VCS paths).
    #[serde(default)]
    pub documents: Vec<String>,
}

/// One PR review comment worth of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    /// VCS path the comment is anchored to.
    pub path: String,
    pub line: u32,
    pub symbol: String,
    pub target_package: String,
    pub kinds: Vec<ViolationKind>,
    pub violations: Vec<ViolationRecord>,
    /// Every anchor covered by the group; the first one is `path:line`.
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Pass,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub comments_emitted: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub comments_truncated: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckReport {
    pub schema: String,
    pub tool: ToolMeta,
    pub diff: DiffMeta,
    pub comments: Vec<Comment>,
    pub counts: KindCounts,
    pub verdict: Verdict,
}

/// The on-disk configuration file (`packguard.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,

    /// Maximum number of comment groups. Unset means the per-command default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_comments: Option<u32>,

    /// Violation kinds to report. Unset means the known kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_kinds: Option<Vec<ViolationKind>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<GroupingStrategy>,

    /// Project directory relative to the VCS root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,

    /// Globs selecting tracking documents among changed files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_patterns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_backend: Option<PatchBackend>,

    /// Autoload roots used to locate the file that defines a symbol.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_paths: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<FailOn>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            base: Some("origin/main".to_string()),
            head: Some("HEAD".to_string()),
            max_comments: None,
            violation_kinds: None,
            grouping: Some(GroupingStrategy::PerSymbolPerLocation),
            root_path: None,
            document_patterns: None,
            patch_backend: Some(PatchBackend::Builtin),
            load_paths: vec![],
            fail_on: Some(FailOn::Never),
        }
    }
}

pub fn default_document_patterns() -> Vec<String> {
    vec![
        format!("**/{PACKAGE_TODO_FILE}"),
        format!("**/{DEPRECATED_REFERENCES_FILE}"),
    ]
}
