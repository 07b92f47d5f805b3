//! Configuration discovery, parsing and flag merging.
//!
//! Precedence is CLI flag, then `packguard.toml`, then built-in default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use packguard_domain::DocumentMatcher;
use packguard_types::{
    ConfigFile, DEFAULT_MAX_COMMENTS, DEFAULT_OFFENSE_MAX_COMMENTS, Defaults, FailOn,
    GroupingStrategy, PatchBackend, ViolationKind, default_document_patterns,
};

use crate::env_expand::expand_env_vars;

pub const DEFAULT_CONFIG_FILE: &str = "packguard.toml";

/// Loads `path`, or `./packguard.toml` when present, or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let discovered = match path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            p.exists().then_some(p)
        }
    };
    let Some(path) = discovered else {
        debug!("no config file found; using built-in defaults");
        return Ok(ConfigFile::default());
    };

    info!(config = %path.display(), "loading config");
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    parse_config(&text).with_context(|| format!("parse config '{}'", path.display()))
}

pub fn parse_config(text: &str) -> Result<ConfigFile> {
    let expanded = expand_env_vars(text)?;
    let config: ConfigFile = toml::from_str(&expanded).context("invalid TOML")?;
    Ok(config)
}

/// Which entry point is asking; only the comment cap differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    TrackingDocuments,
    LinterOffenses,
}

impl Route {
    fn default_max_comments(self) -> u32 {
        match self {
            Route::TrackingDocuments => DEFAULT_MAX_COMMENTS,
            Route::LinterOffenses => DEFAULT_OFFENSE_MAX_COMMENTS,
        }
    }
}

/// Values given on the command line; `None`/empty defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base: Option<String>,
    pub head: Option<String>,
    pub max_comments: Option<u32>,
    pub violation_kinds: Vec<String>,
    pub grouping: Option<GroupingStrategy>,
    pub root_path: Option<String>,
    pub patch_backend: Option<PatchBackend>,
    pub load_paths: Vec<String>,
    pub fail_on: Option<FailOn>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base: String,
    pub head: String,
    pub max_comments: u32,
    pub violation_kinds: Option<Vec<ViolationKind>>,
    pub grouping: GroupingStrategy,
    pub root_path: Option<String>,
    pub document_patterns: Vec<String>,
    pub patch_backend: PatchBackend,
    pub load_paths: Vec<String>,
    pub fail_on: FailOn,
}

impl Settings {
    pub fn resolve(defaults: &Defaults, overrides: Overrides, route: Route) -> Self {
        let violation_kinds = if overrides.violation_kinds.is_empty() {
            defaults.violation_kinds.clone()
        } else {
            Some(
                overrides
                    .violation_kinds
                    .into_iter()
                    .map(ViolationKind::from)
                    .collect(),
            )
        };
        let load_paths = if overrides.load_paths.is_empty() {
            defaults.load_paths.clone()
        } else {
            overrides.load_paths
        };

        Self {
            base: overrides
                .base
                .or_else(|| defaults.base.clone())
                .unwrap_or_else(|| "origin/main".to_string()),
            head: overrides
                .head
                .or_else(|| defaults.head.clone())
                .unwrap_or_else(|| "HEAD".to_string()),
            max_comments: overrides
                .max_comments
                .or(defaults.max_comments)
                .unwrap_or_else(|| route.default_max_comments()),
            violation_kinds,
            grouping: overrides.grouping.or(defaults.grouping).unwrap_or_default(),
            root_path: overrides.root_path.or_else(|| defaults.root_path.clone()),
            document_patterns: defaults
                .document_patterns
                .clone()
                .unwrap_or_else(default_document_patterns),
            patch_backend: overrides
                .patch_backend
                .or(defaults.patch_backend)
                .unwrap_or_default(),
            load_paths,
            fail_on: overrides.fail_on.or(defaults.fail_on).unwrap_or_default(),
        }
    }

    pub fn document_matcher(&self) -> Result<DocumentMatcher> {
        Ok(DocumentMatcher::compile(&self.document_patterns)?)
    }
}
