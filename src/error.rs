use thiserror::Error;

/// Errors reported back to the caller for invalid user input.
///
/// Malformed profile or log data never ends up here: it is skipped or
/// treated as absent while matching.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Page {requested} is out of range (valid pages: 1..={total_pages})")]
    PageOutOfRange { requested: usize, total_pages: usize },

    #[error("Age bound must be a whole number, got {0:?}")]
    InvalidAgeBound(String),

    #[error("Age bound {value} is outside {min}..={max}")]
    AgeBoundOutOfRange { value: u32, min: u8, max: u8 },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange { field: &'static str, min: u32, max: u32 },

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Viewer profile not found: {0}")]
    ViewerNotFound(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
