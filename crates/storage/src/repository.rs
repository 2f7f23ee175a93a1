use async_trait::async_trait;
use quiz_core::model::{Category, Language, Question};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The store itself is missing or unreachable, as opposed to holding no rows.
    #[error("question store unavailable: {0}")]
    Unavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a question row, including the columns used for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub category: Category,
    pub lang: Language,
    pub text: String,
    pub answer: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn new(
        category: Category,
        lang: Language,
        text: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            category,
            lang,
            text: text.into(),
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn to_question(&self) -> Question {
        Question::new(self.text.clone(), self.answer.clone())
    }
}

/// Read-only row access over the question set.
///
/// Implementations return every matching row; sampling happens above this layer.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Confirm the store exists and holds a question table.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when the store cannot serve queries.
    async fn check_available(&self) -> Result<(), StorageError>;

    /// All questions stored for `(category, lang)`, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn questions_for(
        &self,
        category: Category,
        lang: Language,
    ) -> Result<Vec<Question>, StorageError>;

    /// Unique answers stored for `category`, across all languages.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn distinct_answers(&self, category: Category) -> Result<BTreeSet<String>, StorageError>;
}

/// Immutable in-memory store for tests and prototyping.
///
/// Rows are fixed at construction, so reads take no lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionStore {
    rows: Arc<Vec<QuestionRecord>>,
    available: bool,
}

impl InMemoryQuestionStore {
    #[must_use]
    pub fn new(rows: Vec<QuestionRecord>) -> Self {
        Self {
            rows: Arc::new(rows),
            available: true,
        }
    }

    /// A store that fails every call with `StorageError::Unavailable`.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            rows: Arc::new(Vec::new()),
            available: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable("in-memory store disabled".into()))
        }
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn check_available(&self) -> Result<(), StorageError> {
        self.ensure_available()
    }

    async fn questions_for(
        &self,
        category: Category,
        lang: Language,
    ) -> Result<Vec<Question>, StorageError> {
        self.ensure_available()?;
        Ok(self
            .rows
            .iter()
            .filter(|r| r.category == category && r.lang == lang)
            .map(QuestionRecord::to_question)
            .collect())
    }

    async fn distinct_answers(&self, category: Category) -> Result<BTreeSet<String>, StorageError> {
        self.ensure_available()?;
        Ok(self
            .rows
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.answer.clone())
            .collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(rows: Vec<QuestionRecord>) -> Self {
        let questions: Arc<dyn QuestionStore> = Arc::new(InMemoryQuestionStore::new(rows));
        Self { questions }
    }
}
