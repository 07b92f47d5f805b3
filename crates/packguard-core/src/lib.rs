//! Core engine: orchestrates tracking-document diffing, rename suppression
//! and comment planning into a `packguard.check.v1` receipt.
//!
//! Version control and symbol lookup stay outside: documents and patches come
//! in through [`PatchSource`], symbol definitions through
//! [`packguard_domain::SymbolResolver`].

mod check;
mod engine;
mod offense;
mod report;
mod root;
mod source;

pub use check::{CheckPlan, CheckRun, run_check};
pub use engine::{EngineError, EngineOutcome, ViolationDiffEngine};
pub use offense::run_offense_check;
pub use report::{compute_exit_code, render_comments};
pub use root::ProjectRoot;
pub use source::{ChangeSet, MemorySource, PatchSource};
