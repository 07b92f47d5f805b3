use std::collections::HashSet;
use std::path::Path;

use packguard_types::{Location, RecordOrigin, ViolationKind, ViolationRecord};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::locate::LineIndex;

#[derive(Debug, thiserror::Error)]
pub enum TodoParseError {
    #[error("malformed tracking document '{document}': {source}")]
    Malformed {
        document: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unexpected structure in tracking document '{document}': {detail}")]
    UnexpectedShape { document: String, detail: String },

    #[error(
        "unable to find symbol '{symbol}' (package '{package}', kind '{kind}') in '{document}'"
    )]
    SymbolNotFound {
        document: String,
        symbol: String,
        package: String,
        kind: String,
    },

    #[error(
        "unable to find file '{file}' under symbol '{symbol}' (package '{package}', kind '{kind}') in '{document}'"
    )]
    FileNotFound {
        document: String,
        symbol: String,
        package: String,
        kind: String,
        file: String,
    },
}

impl TodoParseError {
    /// The structured content and the raw text disagree.
    pub fn is_inconsistency(&self) -> bool {
        matches!(
            self,
            TodoParseError::SymbolNotFound { .. } | TodoParseError::FileNotFound { .. }
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct SymbolEntry {
    #[serde(default)]
    violations: Vec<String>,
    #[serde(default)]
    files: Vec<String>,
}

/// The package that owns a tracking document: its directory, or `.` at the root.
pub fn package_root(document_path: &str) -> String {
    match Path::new(document_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.to_string_lossy().replace('\\', "/")
        }
        _ => ".".to_string(),
    }
}

/// Parses a tracking document into violation records.
///
/// `content` is `None` when the document does not exist on this side of the
/// change; that yields no records. Records come out in document order:
/// packages, then symbols, then kinds, then files. Duplicates collapse to the
/// first occurrence.
pub fn parse_tracking_document(
    document_path: &str,
    content: Option<&str>,
) -> Result<Vec<ViolationRecord>, TodoParseError> {
    let Some(text) = content else {
        return Ok(Vec::new());
    };
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let root: Option<Mapping> =
        serde_yaml::from_str(text).map_err(|source| TodoParseError::Malformed {
            document: document_path.to_string(),
            source,
        })?;
    let Some(root) = root else {
        return Ok(Vec::new());
    };

    let index = LineIndex::new(text);
    let source_package = package_root(document_path);
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (package_key, symbols) in &root {
        let package = scalar_key(document_path, package_key)?;
        let symbols = match symbols {
            Value::Null => continue,
            Value::Mapping(m) => m,
            _ => {
                return Err(TodoParseError::UnexpectedShape {
                    document: document_path.to_string(),
                    detail: format!("package '{package}' is not a mapping"),
                });
            }
        };

        for (symbol_key, entry) in symbols {
            let symbol = scalar_key(document_path, symbol_key)?;
            let entry: SymbolEntry = match entry {
                Value::Null => SymbolEntry::default(),
                other => serde_yaml::from_value(other.clone()).map_err(|source| {
                    TodoParseError::Malformed {
                        document: document_path.to_string(),
                        source,
                    }
                })?,
            };
            if entry.violations.is_empty() || entry.files.is_empty() {
                continue;
            }

            let first_kind = entry.violations[0].clone();
            let symbol_line =
                index
                    .find_symbol_key(&symbol)
                    .ok_or_else(|| TodoParseError::SymbolNotFound {
                        document: document_path.to_string(),
                        symbol: symbol.clone(),
                        package: package.clone(),
                        kind: first_kind,
                    })?;

            for kind in &entry.violations {
                for file in &entry.files {
                    let file_line = index.find_file_after(file, symbol_line).ok_or_else(|| {
                        TodoParseError::FileNotFound {
                            document: document_path.to_string(),
                            symbol: symbol.clone(),
                            package: package.clone(),
                            kind: kind.clone(),
                            file: file.clone(),
                        }
                    })?;

                    let record = ViolationRecord {
                        symbol_name: symbol.clone(),
                        referencing_file: file.clone(),
                        target_package_name: package.clone(),
                        source_package_name: Some(source_package.clone()),
                        kind: ViolationKind::from(kind.as_str()),
                        strict: false,
                        location: Location::new(document_path, line_number(file_line)),
                        origin: RecordOrigin::TrackingDocument,
                    };
                    if seen.insert(record.clone()) {
                        records.push(record);
                    }
                }
            }
        }
    }

    tracing::debug!(
        document = document_path,
        records = records.len(),
        "parsed tracking document"
    );
    Ok(records)
}

fn scalar_key(document_path: &str, key: &Value) -> Result<String, TodoParseError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(TodoParseError::UnexpectedShape {
            document: document_path.to_string(),
            detail: "non-scalar mapping key".to_string(),
        }),
    }
}

fn line_number(zero_based: usize) -> u32 {
    u32::try_from(zero_based.saturating_add(1)).unwrap_or(u32::MAX)
}
