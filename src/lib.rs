//! Matrimonial match engine - filtering, diagnostics and ranking of
//! candidate profiles for one viewer.
//!
//! The library is a pure pipeline: relation index, match predicate,
//! empty-result diagnostics, sorting and pagination. Callers own I/O,
//! persistence and scheduling.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchInputs, Matcher, MatcherOptions};
pub use error::{EngineError, EngineResult};
pub use models::{
    DiagnosticReport, ExtendedFilters, MatchOutcome, MatchSnapshot, Profile, RelationLogs, SortStrategy,
};
