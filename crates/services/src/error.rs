//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ValidationError;
use quiz_core::model::{Category, Language, SessionPhase, SessionStateError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuestionRepository`.
///
/// An empty result is not an error; only a failing store is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionQueryError {
    #[error(transparent)]
    Store(#[from] StorageError),
}

/// What the transport should offer the user after a failed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Ask again at the same step.
    Retry,
    /// Send the user back to language selection.
    Restart,
}

/// Errors emitted by `QuizController`. None of them end the process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no questions available for {category} in {lang}")]
    NoQuestions { category: Category, lang: Language },

    #[error(transparent)]
    State(#[from] SessionStateError),
}

impl QuizError {
    pub(crate) fn unexpected(event: &'static str, phase: SessionPhase) -> Self {
        Self::State(SessionStateError::UnexpectedEvent { event, phase })
    }

    #[must_use]
    pub fn recovery(&self) -> Recovery {
        match self {
            QuizError::Validation(_) | QuizError::NoQuestions { .. } => Recovery::Retry,
            QuizError::State(_) => Recovery::Restart,
        }
    }
}

/// Errors emitted while bootstrapping services. Fatal for the process.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
