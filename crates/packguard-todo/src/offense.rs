use packguard_types::{Location, RecordOrigin, ViolationKind, ViolationRecord};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum OffenseParseError {
    #[error("invalid offense report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("offense #{index} has an empty '{field}'")]
    MissingField { index: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
struct OffenseReport {
    #[serde(default)]
    offenses: Vec<RawOffense>,
}

#[derive(Debug, Deserialize)]
struct RawOffense {
    violation_type: String,
    file: String,
    line: u32,
    #[serde(default)]
    column: u32,
    constant_name: String,
    referencing_pack_name: String,
    defining_pack_name: String,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    message: String,
}

/// Adapts the linter's `{"offenses": [...]}` JSON output into records.
///
/// Each offense is anchored at its own source line. Exact duplicates are kept:
/// the linter reports one offense per reference site.
pub fn parse_offense_report(json: &str) -> Result<Vec<ViolationRecord>, OffenseParseError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let report: OffenseReport = serde_json::from_str(json)?;

    report
        .offenses
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            for (field, value) in [
                ("file", &raw.file),
                ("constant_name", &raw.constant_name),
                ("defining_pack_name", &raw.defining_pack_name),
            ] {
                if value.is_empty() {
                    return Err(OffenseParseError::MissingField { index, field });
                }
            }
            Ok(ViolationRecord {
                symbol_name: raw.constant_name,
                location: Location::new(raw.file.clone(), raw.line),
                referencing_file: raw.file,
                target_package_name: raw.defining_pack_name,
                source_package_name: Some(raw.referencing_pack_name)
                    .filter(|p| !p.is_empty()),
                kind: ViolationKind::from(raw.violation_type),
                strict: raw.strict,
                origin: RecordOrigin::LinterOffense {
                    column: raw.column,
                    message: raw.message,
                },
            })
        })
        .collect()
}
