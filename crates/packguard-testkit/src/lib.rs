//! Shared test utilities for the packguard workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for records and tracking documents
//! - **todo_builder**: Tracking document builder
//! - **diff_builder**: Unified diff builders, including [`forward_patch`]
//! - **schema**: JSON schema validators for DTOs
//! - **fixtures**: Sample documents, offense reports and configs

pub mod arb;
pub mod diff_builder;
pub mod fixtures;
pub mod schema;
pub mod todo_builder;

pub use arb::{DocModel, arb_doc_model, arb_grouping, arb_kind, arb_record, arb_records};
pub use diff_builder::{FileBuilder, HunkBuilder, forward_patch};
pub use schema::{validate_check_json, validate_check_report, validate_config_json};
pub use todo_builder::{Quote, TodoDocBuilder};
