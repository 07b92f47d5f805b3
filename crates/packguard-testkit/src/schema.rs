//! JSON schema validators for packguard DTOs.
//!
//! Schemas are generated from the types with schemars at validation time, the
//! same way `cargo xtask schema` writes them to disk.

use jsonschema::JSONSchema;
use packguard_types::{CheckReport, ConfigFile};
use schemars::schema_for;

#[derive(Debug)]
pub struct SchemaValidationError {
    pub errors: Vec<String>,
}

impl std::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema validation failed: {}", self.errors.join("; "))
    }
}

impl std::error::Error for SchemaValidationError {}

fn compile(schema: schemars::schema::RootSchema) -> JSONSchema {
    let value = serde_json::to_value(schema).expect("schema should serialize");
    JSONSchema::compile(&value).expect("schema should compile")
}

pub fn validate_config_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    validate_with_schema(&compile(schema_for!(ConfigFile)), json)
}

pub fn validate_check_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    validate_with_schema(&compile(schema_for!(CheckReport)), json)
}

pub fn validate_check_report(report: &CheckReport) -> Result<(), SchemaValidationError> {
    let json = serde_json::to_value(report).expect("CheckReport should serialize to JSON");
    validate_check_json(&json)
}

fn validate_with_schema(
    schema: &JSONSchema,
    json: &serde_json::Value,
) -> Result<(), SchemaValidationError> {
    match schema.validate(json) {
        Ok(()) => Ok(()),
        Err(errors) => Err(SchemaValidationError {
            errors: errors.map(|e| e.to_string()).collect(),
        }),
    }
}
