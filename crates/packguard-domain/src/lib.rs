//! Domain logic: violation set difference, rename suppression, kind
//! filtering and comment emission.
//!
//! This crate is designed to be I/O-free and highly testable. Symbol
//! resolution, the only outside knowledge it needs, comes in through
//! [`SymbolResolver`].

pub mod diff;
pub mod documents;
pub mod emission;
pub mod filter;
pub mod resolver;
pub mod suppress;

pub use diff::{diff_records, normalize_renames, set_difference};
pub use documents::{DocumentMatcher, DocumentPatternError};
pub use emission::{CommentGroup, CommentPlan, plan_comments};
pub use filter::KindFilter;
pub use resolver::{CachingResolver, SymbolResolver};
pub use suppress::{Suppressed, suppress_renamed_symbols, suppress_renames};
