//! Violation record adapters.
//!
//! Two producers feed the same canonical [`packguard_types::ViolationRecord`]:
//! - tracking documents (`package_todo.yml` / `deprecated_references.yml`),
//!   anchored to the line in the document that lists the referencing file;
//! - the linter's JSON offense report, anchored to the offending source line.

mod document;
mod locate;
mod offense;

pub use document::{TodoParseError, package_root, parse_tracking_document};
pub use locate::LineIndex;
pub use offense::{OffenseParseError, parse_offense_report};
