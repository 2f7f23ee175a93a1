use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::Randomness;
use quiz_core::model::{Category, Language, Question};
use quiz_core::sampling::sample_without_replacement;
use storage::repository::{QuestionStore, StorageError};

use crate::error::QuestionQueryError;

/// Read-only query surface over the question store.
///
/// Draws are uniform samples without replacement over the matching rows.
#[derive(Clone)]
pub struct QuestionRepository {
    store: Arc<dyn QuestionStore>,
    randomness: Randomness,
}

impl QuestionRepository {
    #[must_use]
    pub fn new(store: Arc<dyn QuestionStore>, randomness: Randomness) -> Self {
        Self { store, randomness }
    }

    #[must_use]
    pub fn randomness(&self) -> &Randomness {
        &self.randomness
    }

    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when the store cannot serve queries.
    pub async fn check_available(&self) -> Result<(), StorageError> {
        self.store.check_available().await
    }

    /// Draws `min(limit, available)` questions for `(category, lang)`.
    ///
    /// No matching rows is an empty `Ok`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `QuestionQueryError::Store` if the store fails.
    pub async fn fetch_random(
        &self,
        category: Category,
        lang: Language,
        limit: usize,
    ) -> Result<Vec<Question>, QuestionQueryError> {
        let rows = self.store.questions_for(category, lang).await?;
        if rows.is_empty() {
            log::warn!("no questions stored for {category} in {lang}");
            return Ok(Vec::new());
        }

        let available = rows.len();
        let picked = self
            .randomness
            .with_rng(|rng| sample_without_replacement(rows, limit, rng));
        log::debug!(
            "drew {} of {available} questions for {category}/{lang} (limit {limit})",
            picked.len()
        );
        Ok(picked)
    }

    /// Like `fetch_random`, for codes that have not been decoded yet.
    ///
    /// Unknown category or language codes yield an empty result.
    ///
    /// # Errors
    ///
    /// Returns `QuestionQueryError::Store` if the store fails.
    pub async fn fetch_random_by_code(
        &self,
        category: &str,
        lang: &str,
        limit: usize,
    ) -> Result<Vec<Question>, QuestionQueryError> {
        let (category, lang) = match (category.parse::<Category>(), lang.parse::<Language>()) {
            (Ok(category), Ok(lang)) => (category, lang),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("rejected question query: {e}");
                return Ok(Vec::new());
            }
        };
        self.fetch_random(category, lang, limit).await
    }

    /// Unique answers stored for `category`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionQueryError::Store` if the store fails.
    pub async fn fetch_distinct_answers(
        &self,
        category: Category,
    ) -> Result<BTreeSet<String>, QuestionQueryError> {
        Ok(self.store.distinct_answers(category).await?)
    }

    /// Like `fetch_distinct_answers`; an unknown category code yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionQueryError::Store` if the store fails.
    pub async fn fetch_distinct_answers_by_code(
        &self,
        category: &str,
    ) -> Result<BTreeSet<String>, QuestionQueryError> {
        match category.parse::<Category>() {
            Ok(category) => self.fetch_distinct_answers(category).await,
            Err(e) => {
                log::warn!("rejected answer query: {e}");
                Ok(BTreeSet::new())
            }
        }
    }
}
