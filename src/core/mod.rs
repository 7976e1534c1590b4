// Core algorithm exports
pub mod diagnostics;
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod pagination;
pub mod relations;
pub mod scoring;
pub mod sorting;

pub use diagnostics::DiagnosticAnalyzer;
pub use filters::{
    active_filter_count, evaluate, in_base_pool, ClauseContext, FilterClause, FilterKey, FilterState,
    FilterValue, PredicateEvaluator,
};
pub use matcher::{query_fingerprint, MatchInputs, Matcher, MatcherOptions};
pub use normalize::{height_to_cm, income_to_units};
pub use pagination::{PageState, Paginator};
pub use relations::{build_status_map, RelationIndex, StatusMap};
pub use scoring::compatibility_score;
pub use sorting::sort_profiles;
