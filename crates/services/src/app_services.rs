use std::sync::Arc;

use quiz_core::Randomness;
use storage::repository::{QuestionRecord, Storage};

use crate::controller::QuizController;
use crate::distractors::DistractorSampler;
use crate::error::AppServicesError;
use crate::questions::QuestionRepository;
use crate::sessions::SessionStore;

/// Assembles the quiz services over one question store.
#[derive(Clone)]
pub struct QuizServices {
    questions: QuestionRepository,
    sessions: Arc<SessionStore>,
    controller: QuizController,
}

impl QuizServices {
    /// Build services backed by an existing `SQLite` question database.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or has no
    /// question table.
    pub async fn new_sqlite(db_url: &str, randomness: Randomness) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, randomness).await
    }

    /// Build services over fixed rows. Used by tests and demos.
    ///
    /// # Errors
    ///
    /// Never fails for in-memory rows; kept fallible to match `new_sqlite`.
    pub async fn in_memory(
        rows: Vec<QuestionRecord>,
        randomness: Randomness,
    ) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(rows), randomness).await
    }

    async fn from_storage(storage: Storage, randomness: Randomness) -> Result<Self, AppServicesError> {
        let questions = QuestionRepository::new(Arc::clone(&storage.questions), randomness.clone());
        questions.check_available().await?;

        let sessions = Arc::new(SessionStore::new());
        let distractors = DistractorSampler::new(questions.clone(), randomness);
        let controller = QuizController::new(Arc::clone(&sessions), questions.clone(), distractors);
        log::debug!("quiz services ready");

        Ok(Self {
            questions,
            sessions,
            controller,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionRepository {
        &self.questions
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn controller(&self) -> QuizController {
        self.controller.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Category, Language};
    use storage::repository::StorageError;

    #[tokio::test]
    async fn unavailable_store_fails_bootstrap() {
        let storage = Storage {
            questions: Arc::new(storage::repository::InMemoryQuestionStore::unavailable()),
        };
        let err = QuizServices::from_storage(storage, Randomness::seeded(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            AppServicesError::Storage(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn controller_shares_the_session_store() {
        let rows = vec![QuestionRecord::new(Category::Web, Language::Uz, "HTML?", "Markup")];
        let services = QuizServices::in_memory(rows, Randomness::seeded(1)).await.unwrap();
        let uid = quiz_core::model::UserId::new(5);
        services
            .controller()
            .choose_language(uid, Language::Uz)
            .await
            .unwrap();
        assert!(services.sessions().get(uid).await.is_some());
    }
}
