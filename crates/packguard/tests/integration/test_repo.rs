//! Test repository helper for BDD integration tests.
//!
//! Provides a `TestRepo` struct that wraps a temporary git repository holding
//! tracking documents, plus helpers that run the packguard binary against it.

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test git repository for integration testing.
pub struct TestRepo {
    /// The temporary directory containing the repo.
    pub dir: TempDir,
    /// The SHA of the base commit (first commit).
    pub base_sha: String,
}

impl TestRepo {
    /// Create a repository whose first commit holds only a README.
    pub fn new() -> Self {
        Self::with_initial_content(&[("README.md", "# app\n")])
    }

    /// Create a repository whose first commit holds `files`.
    pub fn with_initial_content(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path();

        run_git(path, &["init", "--quiet"]);
        run_git(path, &["config", "user.email", "test@example.com"]);
        run_git(path, &["config", "user.name", "Test"]);
        run_git(path, &["config", "commit.gpgsign", "false"]);

        for (file_path, content) in files {
            write(path, file_path, content);
        }
        run_git(path, &["add", "."]);
        run_git(path, &["commit", "--quiet", "-m", "initial baseline"]);

        let base_sha = run_git(path, &["rev-parse", "HEAD"]);
        Self { dir, base_sha }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, relative_path: &str, content: &str) {
        write(self.path(), relative_path, content);
    }

    pub fn remove_file(&self, relative_path: &str) {
        run_git(self.path(), &["rm", "--quiet", relative_path]);
    }

    pub fn move_file(&self, from: &str, to: &str) {
        if let Some(parent) = self.path().join(to).parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        run_git(self.path(), &["mv", from, to]);
    }

    /// Stage everything and commit; returns the new SHA.
    pub fn commit(&self, message: &str) -> String {
        run_git(self.path(), &["add", "-A"]);
        run_git(self.path(), &["commit", "--quiet", "-m", message]);
        run_git(self.path(), &["rev-parse", "HEAD"])
    }

    pub fn write_config(&self, content: &str) {
        self.write_file("packguard.toml", content);
    }

    /// A `packguard` command running inside the repository.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(cargo::cargo_bin!("packguard"));
        cmd.current_dir(self.path()).env_remove("RUST_LOG");
        cmd
    }

    pub fn run_check(&self, head_sha: &str) -> PackguardResult {
        self.run_check_with_args(head_sha, &[])
    }

    /// Run `packguard check` between the base commit and `head_sha`.
    pub fn run_check_with_args(&self, head_sha: &str, extra_args: &[&str]) -> PackguardResult {
        let base = self.base_sha.clone();
        self.run("check", &base, head_sha, extra_args)
    }

    /// Run `packguard offenses` with the given report file.
    pub fn run_offenses(&self, head_sha: &str, report: &str, extra_args: &[&str]) -> PackguardResult {
        let base = self.base_sha.clone();
        let mut args = vec!["--report", report];
        args.extend_from_slice(extra_args);
        self.run("offenses", &base, head_sha, &args)
    }

    fn run(&self, subcommand: &str, base: &str, head: &str, extra_args: &[&str]) -> PackguardResult {
        let out_path = self.path().join("artifacts/packguard/report.json");
        let _ = std::fs::remove_file(&out_path);

        let mut cmd = self.command();
        cmd.arg(subcommand)
            .arg("--base")
            .arg(base)
            .arg("--head")
            .arg(head)
            .arg("--out")
            .arg(&out_path)
            .args(extra_args);

        let output = cmd.output().expect("run packguard");
        let receipt = out_path
            .exists()
            .then(|| std::fs::read_to_string(&out_path).expect("read receipt"));

        PackguardResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            receipt,
            output_path: out_path,
        }
    }
}

/// The result of running a packguard command.
#[derive(Debug)]
pub struct PackguardResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The JSON receipt content (if written).
    pub receipt: Option<String>,
    pub output_path: PathBuf,
}

impl PackguardResult {
    pub fn assert_exit_code(&self, expected: i32) -> &Self {
        assert_eq!(
            self.exit_code, expected,
            "Expected exit code {} but got {}.\nstderr: {}\nstdout: {}",
            expected, self.exit_code, self.stderr, self.stdout
        );
        self
    }

    pub fn assert_stdout_contains(&self, needle: &str) -> &Self {
        assert!(
            self.stdout.contains(needle),
            "Expected stdout to contain '{}'.\nstdout: {}",
            needle,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, needle: &str) -> &Self {
        assert!(
            self.stderr.contains(needle),
            "Expected stderr to contain '{}'.\nstderr: {}",
            needle,
            self.stderr
        );
        self
    }

    /// Parse the receipt; it must exist and validate against the schema.
    pub fn parse_receipt(&self) -> ParsedReceipt {
        let receipt = self.receipt.as_ref().unwrap_or_else(|| {
            panic!(
                "Expected receipt at {:?}.\nstderr: {}",
                self.output_path, self.stderr
            )
        });
        let json: serde_json::Value =
            serde_json::from_str(receipt).expect("receipt should be valid JSON");
        packguard_testkit::validate_check_json(&json).expect("receipt should match the schema");
        ParsedReceipt { json }
    }
}

/// A parsed JSON receipt for detailed assertions.
pub struct ParsedReceipt {
    pub json: serde_json::Value,
}

impl ParsedReceipt {
    pub fn comments(&self) -> Vec<serde_json::Value> {
        self.json["comments"].as_array().cloned().unwrap_or_default()
    }

    pub fn comment_count(&self) -> usize {
        self.comments().len()
    }

    /// `(path, line, symbol)` of every comment, in order.
    pub fn comment_anchors(&self) -> Vec<(String, u64, String)> {
        self.comments()
            .iter()
            .map(|c| {
                (
                    c["path"].as_str().unwrap_or_default().to_string(),
                    c["line"].as_u64().unwrap_or_default(),
                    c["symbol"].as_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    pub fn added(&self, kind: &str) -> u64 {
        self.json["counts"]["added"][kind].as_u64().unwrap_or(0)
    }

    pub fn removed(&self, kind: &str) -> u64 {
        self.json["counts"]["removed"][kind].as_u64().unwrap_or(0)
    }

    pub fn verdict_status(&self) -> Option<&str> {
        self.json["verdict"]["status"].as_str()
    }

    pub fn reasons(&self) -> Vec<String> {
        self.json["verdict"]["reasons"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|r| r.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn truncated(&self) -> u64 {
        self.json["verdict"]["comments_truncated"]
            .as_u64()
            .unwrap_or(0)
    }

    pub fn documents(&self) -> Vec<String> {
        self.json["diff"]["documents"]
            .as_array()
            .map(|a| {
                a.iter()
                    .filter_map(|d| d.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn write(root: &Path, relative_path: &str, content: &str) {
    let full_path = root.join(relative_path);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&full_path, content).expect("write file");
}

/// Run a git command and return the trimmed stdout.
fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("git command should run");

    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_creates_valid_git_repo() {
        let repo = TestRepo::new();
        assert!(repo.path().join(".git").exists());
        assert_eq!(repo.base_sha.len(), 40);
    }

    #[test]
    fn commit_returns_a_new_sha() {
        let repo = TestRepo::new();
        repo.write_file("packs/a/package_todo.yml", "---\n");
        let head = repo.commit("add todo");
        assert_ne!(head, repo.base_sha);
    }
}
