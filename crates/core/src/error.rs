use thiserror::Error;

/// Input rejected before it reaches the quiz engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("question count {0} is not one of 3, 5, 10")]
    UnsupportedCount(u32),

    #[error("failed to parse {kind} from {raw:?}")]
    Parse { kind: &'static str, raw: String },
}
