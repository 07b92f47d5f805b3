use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use packguard_types::PatchBackend;
use tempfile::TempDir;

use crate::reverse::reverse_apply;
use crate::unified::{FilePatch, parse_patch};
use crate::{PatchError, git};

const PATCH_FILE: &str = "reverse.patch";
const TREE_DIR: &str = "tree";

/// Outcome of a reconstruction.
///
/// Reversal failures are soft: `before` then holds whatever the scratch copy
/// contained after the attempt (usually the unchanged current content) and
/// `error` says why.
#[derive(Debug)]
pub struct Reconstruction {
    /// Content before the change; `None` when the file did not exist.
    pub before: Option<String>,
    pub error: Option<PatchError>,
}

impl Reconstruction {
    fn clean(before: Option<String>) -> Self {
        Self {
            before,
            error: None,
        }
    }

    fn failed(before: Option<String>, error: PatchError) -> Self {
        Self {
            before,
            error: Some(error),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

/// Recovers the prior content of a document by reversing its forward patch.
///
/// Every call works in its own scratch directory holding a copy of the
/// document, so the caller's working tree is never touched and one document's
/// failure cannot leak into the next.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconstructor {
    backend: PatchBackend,
}

impl Reconstructor {
    pub fn new(backend: PatchBackend) -> Self {
        Self { backend }
    }

    /// `current` is the document's content after the change (`None` if the
    /// change deleted it); `patch` is the forward unified diff for it.
    pub fn reconstruct_before(
        &self,
        document_path: &str,
        current: Option<&str>,
        patch: &str,
    ) -> Reconstruction {
        let unchanged = || current.map(str::to_string);

        let file_patch = match select_file_patch(document_path, patch) {
            Ok(Some(p)) => p,
            Ok(None) => return Reconstruction::clean(unchanged()),
            Err(err) => return self.soft_fail(document_path, unchanged(), err),
        };

        let relative = match scratch_relative(document_path) {
            Ok(p) => p,
            Err(err) => return self.soft_fail(document_path, unchanged(), err),
        };

        let scratch = match tempfile::Builder::new().prefix("packguard-").tempdir() {
            Ok(dir) => dir,
            Err(source) => {
                let err = PatchError::Io {
                    path: "<scratch>".to_string(),
                    source,
                };
                return self.soft_fail(document_path, unchanged(), err);
            }
        };

        let result = self.reverse_in(&scratch, &relative, document_path, current, &file_patch);
        let outcome = match result {
            Ok(before) => Reconstruction::clean(before),
            Err(err) => {
                let on_disk = read_optional(&scratch.path().join(TREE_DIR).join(&relative))
                    .unwrap_or_else(|_| unchanged());
                self.soft_fail(document_path, on_disk, err)
            }
        };

        let scratch_path = scratch.path().to_path_buf();
        if let Err(err) = scratch.close() {
            tracing::warn!(
                scratch = %scratch_path.display(),
                error = %err,
                "failed to remove reconstruction scratch directory"
            );
        }
        outcome
    }

    fn reverse_in(
        &self,
        scratch: &TempDir,
        relative: &Path,
        document_path: &str,
        current: Option<&str>,
        file_patch: &FilePatch,
    ) -> Result<Option<String>, PatchError> {
        let tree = scratch.path().join(TREE_DIR);
        let target = tree.join(relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        if let Some(content) = current {
            fs::write(&target, content).map_err(|e| io_error(&target, e))?;
        }

        let patch_path = scratch.path().join(PATCH_FILE);
        let patch_text = ensure_trailing_newline(file_patch.render(document_path));
        fs::write(&patch_path, patch_text).map_err(|e| io_error(&patch_path, e))?;

        match self.backend {
            PatchBackend::Builtin => {
                let on_disk = read_optional(&target)?;
                match reverse_apply(on_disk.as_deref(), file_patch)? {
                    Some(before) => fs::write(&target, before).map_err(|e| io_error(&target, e))?,
                    None if target.exists() => {
                        fs::remove_file(&target).map_err(|e| io_error(&target, e))?
                    }
                    None => {}
                }
            }
            PatchBackend::Git => git::apply_reverse(&tree, &patch_path)?,
        }

        read_optional(&target)
    }

    fn soft_fail(
        &self,
        document_path: &str,
        before: Option<String>,
        err: PatchError,
    ) -> Reconstruction {
        tracing::warn!(
            document = document_path,
            backend = self.backend.as_str(),
            error = %err,
            "patch reversal failed; using best-effort prior content"
        );
        Reconstruction::failed(before, err)
    }
}

/// Patch tooling rejects input whose last line is unterminated.
pub fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn select_file_patch(document_path: &str, patch: &str) -> Result<Option<FilePatch>, PatchError> {
    if patch.trim().is_empty() {
        return Ok(None);
    }
    let mut files = parse_patch(patch)?;
    if files.is_empty() {
        return Ok(None);
    }

    let matching = files.iter().position(|f| {
        f.new_path.as_deref() == Some(document_path) || f.old_path.as_deref() == Some(document_path)
    });
    match matching {
        Some(idx) => Ok(Some(files.swap_remove(idx))),
        None if files.len() == 1 => Ok(files.pop()),
        None => Err(PatchError::NoMatchingFile(document_path.to_string())),
    }
}

/// The document path must stay inside the scratch tree.
fn scratch_relative(document_path: &str) -> Result<PathBuf, PatchError> {
    let path = Path::new(document_path);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return Err(PatchError::UnsafePath(document_path.to_string())),
        }
    }
    if out.as_os_str().is_empty() {
        return Err(PatchError::UnsafePath(document_path.to_string()));
    }
    Ok(out)
}

fn read_optional(path: &Path) -> Result<Option<String>, PatchError> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Path, source: io::Error) -> PatchError {
    PatchError::Io {
        path: path.display().to_string(),
        source,
    }
}
