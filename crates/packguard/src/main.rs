#![allow(clippy::collapsible_if)]

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use packguard_core::{CheckPlan, CheckRun, ProjectRoot, run_check, run_offense_check};
use packguard_domain::{CachingResolver, SymbolResolver};
use packguard_types::{
    FailOn, GroupingStrategy, KindCounts, PatchBackend, ViolationDiff, ViolationRecord,
};

mod config_loader;
mod env_expand;
mod git;
mod resolver;

use config_loader::{DEFAULT_CONFIG_FILE, Overrides, Route, Settings, load_config};
use git::GitSource;
use resolver::ConventionalPathResolver;

const DEFAULT_OUT: &str = "artifacts/packguard/report.json";

#[derive(Parser)]
#[command(name = "packguard")]
#[command(about = "Review new architecture-boundary violations in a change set", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff tracking documents between two refs and plan review comments.
    Check(CheckArgs),

    /// Plan review comments from a linter offense report.
    Offenses(OffensesArgs),

    /// Print the violation records in tracking documents.
    Parse(ParseArgs),

    /// Write a starter packguard.toml.
    Init(InitArgs),
}

/// Options shared by `check` and `offenses`.
#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Base git ref (defaults to config defaults, else origin/main).
    #[arg(long)]
    base: Option<String>,

    /// Head git ref (defaults to config defaults, else HEAD).
    #[arg(long)]
    head: Option<String>,

    /// Path to a config file. If omitted, uses ./packguard.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of review comments.
    #[arg(long)]
    max_comments: Option<u32>,

    /// Violation kind to report. Repeatable; defaults to dependency and privacy.
    #[arg(long = "kind", value_name = "KIND", action = clap::ArgAction::Append)]
    kinds: Vec<String>,

    /// How violations are grouped into comments.
    #[arg(long, value_enum)]
    grouping: Option<GroupingArg>,

    /// Project directory relative to the repository root.
    #[arg(long)]
    root_path: Option<String>,

    /// Autoload directory used to locate constant definitions. Repeatable.
    #[arg(long = "load-path", value_name = "DIR", action = clap::ArgAction::Append)]
    load_paths: Vec<String>,

    /// Fail policy.
    #[arg(long, value_enum)]
    fail_on: Option<FailOnArg>,

    /// Where to write the JSON receipt.
    #[arg(long, default_value = DEFAULT_OUT)]
    out: PathBuf,

    /// Also write the pre-comment summary (kind counts and documents) here.
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// How prior document content is reconstructed.
    #[arg(long, value_enum)]
    patch_backend: Option<BackendArg>,
}

#[derive(Parser, Debug)]
struct OffensesArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Linter JSON report (or '-' for stdin).
    #[arg(long, value_name = "PATH")]
    report: PathBuf,

    /// Do not ask git for renames between base and head.
    #[arg(long)]
    no_renames: bool,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Tracking documents to parse.
    #[arg(required = true)]
    documents: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Output path for the configuration file.
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    output: PathBuf,

    /// Overwrite an existing configuration file.
    #[arg(long, short)]
    force: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GroupingArg {
    PerSymbolPerLocation,
    PerSymbolPerPackage,
}

impl From<GroupingArg> for GroupingStrategy {
    fn from(v: GroupingArg) -> Self {
        match v {
            GroupingArg::PerSymbolPerLocation => GroupingStrategy::PerSymbolPerLocation,
            GroupingArg::PerSymbolPerPackage => GroupingStrategy::PerSymbolPerPackage,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Builtin,
    Git,
}

impl From<BackendArg> for PatchBackend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Builtin => PatchBackend::Builtin,
            BackendArg::Git => PatchBackend::Git,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FailOnArg {
    Never,
    Added,
}

impl From<FailOnArg> for FailOn {
    fn from(v: FailOnArg) -> Self {
        match v {
            FailOnArg::Never => FailOn::Never,
            FailOnArg::Added => FailOn::Added,
        }
    }
}

/// Payload of the pre-comment hook, written by `--summary`.
#[derive(Debug, Serialize)]
struct Summary {
    counts: KindCounts,
    documents: Vec<String>,
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Check(args) => cmd_check(args),
        Commands::Offenses(args) => cmd_offenses(args),
        Commands::Parse(args) => {
            cmd_parse(args)?;
            Ok(0)
        }
        Commands::Init(args) => {
            cmd_init(args)?;
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn settings_for(common: &CommonArgs, patch_backend: Option<BackendArg>, route: Route) -> Result<Settings> {
    let cfg = load_config(common.config.as_deref())?;
    let overrides = Overrides {
        base: common.base.clone(),
        head: common.head.clone(),
        max_comments: common.max_comments,
        violation_kinds: common.kinds.clone(),
        grouping: common.grouping.map(Into::into),
        root_path: common.root_path.clone(),
        patch_backend: patch_backend.map(Into::into),
        load_paths: common.load_paths.clone(),
        fail_on: common.fail_on.map(Into::into),
    };
    Ok(Settings::resolve(&cfg.defaults, overrides, route))
}

fn plan_for(settings: &Settings) -> CheckPlan {
    CheckPlan {
        base: settings.base.clone(),
        head: settings.head.clone(),
        max_comments: settings.max_comments as usize,
        grouping: settings.grouping,
        violation_kinds: settings.violation_kinds.clone(),
        fail_on: settings.fail_on,
        patch_backend: settings.patch_backend,
        root_path: settings.root_path.clone(),
    }
}

/// The conventional-path resolver, when load paths are configured.
fn build_resolver(settings: &Settings) -> Option<CachingResolver<ConventionalPathResolver>> {
    if settings.load_paths.is_empty() {
        info!("no load paths configured; rename suppression by symbol is disabled");
        return None;
    }
    let root = ProjectRoot::new(settings.root_path.as_deref());
    let project_dir = if root.is_vcs_root() {
        PathBuf::from(".")
    } else {
        PathBuf::from(root.prefix())
    };
    Some(CachingResolver::new(ConventionalPathResolver::new(
        project_dir,
        settings.load_paths.clone(),
    )))
}

fn cmd_check(args: CheckArgs) -> Result<i32> {
    let settings = settings_for(&args.common, args.patch_backend, Route::TrackingDocuments)?;
    let matcher = settings.document_matcher()?;
    let git = GitSource::new(".", &settings.base, &settings.head);
    let changes = git
        .change_set(&matcher)
        .with_context(|| format!("list changes in {}...{}", settings.base, settings.head))?;

    let resolver = build_resolver(&settings);
    let resolver_ref = resolver.as_ref().map(|r| r as &dyn SymbolResolver);

    let mut summary: Option<Summary> = None;
    let mut hook = |diff: &ViolationDiff, documents: &[String]| {
        log_summary(diff, documents.len());
        summary = Some(Summary {
            counts: diff.counts(),
            documents: documents.to_vec(),
        });
    };
    let run = run_check(&plan_for(&settings), &changes, &git, resolver_ref, &mut hook)?;

    finish(&args.common, &run, summary)
}

fn cmd_offenses(args: OffensesArgs) -> Result<i32> {
    let settings = settings_for(&args.common, None, Route::LinterOffenses)?;
    let report = read_input(&args.report)?;

    let renames = if args.no_renames {
        Vec::new()
    } else {
        GitSource::new(".", &settings.base, &settings.head)
            .renames()
            .with_context(|| format!("list renames in {}...{}", settings.base, settings.head))?
    };

    let resolver = build_resolver(&settings);
    let resolver_ref = resolver.as_ref().map(|r| r as &dyn SymbolResolver);

    let mut summary: Option<Summary> = None;
    let mut hook = |diff: &ViolationDiff, documents: &[String]| {
        log_summary(diff, documents.len());
        summary = Some(Summary {
            counts: diff.counts(),
            documents: documents.to_vec(),
        });
    };
    let run = run_offense_check(&plan_for(&settings), &report, &renames, resolver_ref, &mut hook)?;

    finish(&args.common, &run, summary)
}

fn log_summary(diff: &ViolationDiff, documents: usize) {
    let counts = diff.counts();
    info!(
        documents,
        added_dependency = counts.added.dependency,
        added_privacy = counts.added.privacy,
        removed_dependency = counts.removed.dependency,
        removed_privacy = counts.removed.privacy,
        "violation summary"
    );
}

fn finish(common: &CommonArgs, run: &CheckRun, summary: Option<Summary>) -> Result<i32> {
    write_json(&common.out, &run.report)?;
    if let (Some(path), Some(summary)) = (&common.summary, summary) {
        write_json(path, &summary)?;
    }
    for doc in &run.reconstruction_failures {
        eprintln!("packguard: prior content of '{doc}' was reconstructed best-effort");
    }

    let verdict = &run.report.verdict;
    if verdict.comments_truncated > 0 {
        println!(
            "packguard: {} comment(s) planned, {} dropped by the cap",
            verdict.comments_emitted, verdict.comments_truncated
        );
    } else {
        println!("packguard: {} comment(s) planned", verdict.comments_emitted);
    }
    Ok(run.exit_code)
}

fn cmd_parse(args: ParseArgs) -> Result<()> {
    let mut records: Vec<ViolationRecord> = Vec::new();
    for path in &args.documents {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let name = path.to_string_lossy().replace('\\', "/");
        let parsed = packguard_todo::parse_tracking_document(&name, Some(&text))
            .with_context(|| format!("parse {}", path.display()))?;
        debug!(document = %name, records = parsed.len(), "parsed tracking document");
        records.extend(parsed);
    }
    let json = serde_json::to_string_pretty(&records).context("serialize records")?;
    println!("{json}");
    Ok(())
}

const STARTER_CONFIG: &str = r#"# packguard configuration.
#
# Every value below is optional; flags on the command line take precedence.

[defaults]
base = "origin/main"
head = "HEAD"

# Maximum number of review comments (default 5 for `check`, 15 for `offenses`).
# max_comments = 5

# Violation kinds to report.
violation_kinds = ["dependency", "privacy"]

# "per_symbol_per_location" or "per_symbol_per_package".
grouping = "per_symbol_per_location"

# Project directory relative to the repository root, when they differ.
# root_path = "rails_app"

# document_patterns = ["**/package_todo.yml", "**/deprecated_references.yml"]

# "builtin" or "git".
patch_backend = "builtin"

# Autoload directories; enables suppression of violations caused by renames.
# load_paths = ["app/models", "app/services"]

# "never" or "added".
fail_on = "never"
"#;

fn cmd_init(args: InitArgs) -> Result<()> {
    let output_path = &args.output;
    if output_path.exists() && !args.force {
        bail!(
            "'{}' already exists; pass --force to overwrite it",
            output_path.display()
        );
    }
    write_text(output_path, STARTER_CONFIG)?;
    println!("Created {}.", output_path.display());
    println!("Run 'packguard check' to review tracking document changes.");
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut s = String::new();
        io::stdin()
            .read_to_string(&mut s)
            .context("read offense report from stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn write_json(path: &Path, value: &impl serde::Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serialize receipt")?;
    write_bytes(path, &bytes)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}
