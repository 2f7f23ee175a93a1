use std::sync::Arc;

use quiz_core::model::{
    AnswerOutcome, Category, Language, QuestionCount, QuizEvent, QuizResult, Session, SessionPhase,
    SessionState, UserId,
};
use serde::{Deserialize, Serialize};

use crate::distractors::DistractorSampler;
use crate::error::QuizError;
use crate::questions::QuestionRepository;
use crate::sessions::SessionStore;

//
// ─── REPLIES ───────────────────────────────────────────────────────────────────
//

/// A question ready to be rendered with its answer buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPrompt {
    pub lang: Language,
    /// 1-based position within the quiz.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<String>,
}

/// What follows an answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextStep {
    Question(QuestionPrompt),
    Completed(QuizResult),
}

/// Everything the transport needs to render the next prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizReply {
    ChooseLanguage {
        languages: [Language; 2],
    },
    ChooseCategory {
        lang: Language,
        categories: [Category; 3],
    },
    ChooseCount {
        lang: Language,
        category: Category,
        counts: [u32; 3],
    },
    Question(QuestionPrompt),
    Answered {
        feedback: AnswerOutcome,
        next: NextStep,
    },
    Stopped {
        had_session: bool,
    },
}

impl QuizReply {
    fn choose_language() -> Self {
        QuizReply::ChooseLanguage {
            languages: Language::ALL,
        }
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives each user's session through
/// `Idle -> LanguageChosen -> CategoryChosen -> InProgress -> Completed`.
///
/// Every event holds the user's slot lock for its whole duration, including
/// store reads, so one user's events apply in arrival order.
#[derive(Clone)]
pub struct QuizController {
    sessions: Arc<SessionStore>,
    questions: QuestionRepository,
    distractors: DistractorSampler,
}

impl QuizController {
    #[must_use]
    pub fn new(
        sessions: Arc<SessionStore>,
        questions: QuestionRepository,
        distractors: DistractorSampler,
    ) -> Self {
        Self {
            sessions,
            questions,
            distractors,
        }
    }

    /// Build a controller whose sampler shares the repository's randomness.
    #[must_use]
    pub fn from_repository(questions: QuestionRepository) -> Self {
        let distractors = DistractorSampler::new(questions.clone(), questions.randomness().clone());
        Self::new(Arc::new(SessionStore::new()), questions, distractors)
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Dispatch a decoded event.
    ///
    /// # Errors
    ///
    /// See the individual event methods.
    pub async fn handle(&self, user_id: UserId, event: QuizEvent) -> Result<QuizReply, QuizError> {
        log::debug!("user {user_id}: {}", event.name());
        match event {
            QuizEvent::ChooseLanguage(lang) => self.choose_language(user_id, lang).await,
            QuizEvent::ChooseCategory(category) => self.choose_category(user_id, category).await,
            QuizEvent::ChooseCount(count) => self.choose_count(user_id, count).await,
            QuizEvent::SubmitAnswer(text) => self.submit_answer(user_id, &text).await,
            QuizEvent::Stop => Ok(self.stop(user_id).await),
            QuizEvent::Restart => Ok(self.restart(user_id).await),
        }
    }

    /// `Idle -> LanguageChosen`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::State` if the user already has a session.
    pub async fn choose_language(
        &self,
        user_id: UserId,
        lang: Language,
    ) -> Result<QuizReply, QuizError> {
        let mut guard = self.sessions.lock(user_id).await;
        if guard.session().is_some() {
            return Err(QuizError::unexpected("choose_language", guard.phase()));
        }
        guard.insert(Session::new(user_id, lang));
        Ok(QuizReply::ChooseCategory {
            lang,
            categories: Category::ALL,
        })
    }

    /// `LanguageChosen -> CategoryChosen`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::State` outside `LanguageChosen`.
    pub async fn choose_category(
        &self,
        user_id: UserId,
        category: Category,
    ) -> Result<QuizReply, QuizError> {
        let mut guard = self.sessions.lock(user_id).await;
        let session = guard
            .session_mut()
            .ok_or_else(|| QuizError::unexpected("choose_category", SessionPhase::Idle))?;
        session.choose_category(category)?;
        Ok(QuizReply::ChooseCount {
            lang: session.lang(),
            category,
            counts: QuestionCount::ALLOWED,
        })
    }

    /// `CategoryChosen -> InProgress`, returning the first question.
    ///
    /// The quiz length is the number of questions actually drawn, which may be
    /// smaller than `count`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::State` outside `CategoryChosen` and
    /// `QuizError::NoQuestions` if nothing could be drawn. The session is
    /// unchanged in both cases.
    pub async fn choose_count(
        &self,
        user_id: UserId,
        count: QuestionCount,
    ) -> Result<QuizReply, QuizError> {
        let mut guard = self.sessions.lock(user_id).await;
        let session = guard
            .session_mut()
            .ok_or_else(|| QuizError::unexpected("choose_count", SessionPhase::Idle))?;
        let SessionState::CategoryChosen { lang, category } = *session.state() else {
            return Err(QuizError::unexpected("choose_count", session.phase()));
        };

        let questions = match self
            .questions
            .fetch_random(category, lang, count.as_usize())
            .await
        {
            Ok(questions) => questions,
            Err(e) => {
                log::warn!("user {user_id}: question draw failed, treating as empty: {e}");
                Vec::new()
            }
        };
        if questions.is_empty() {
            return Err(QuizError::NoQuestions { category, lang });
        }

        log::info!(
            "user {user_id}: starting {category} quiz in {lang} with {} of {count} questions",
            questions.len()
        );
        session.begin(questions)?;
        let prompt = self.prepare_next(session).await?;
        Ok(QuizReply::Question(prompt))
    }

    /// Score the pending question and move on.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::State` when no question is waiting for an answer.
    pub async fn submit_answer(
        &self,
        user_id: UserId,
        answer: &str,
    ) -> Result<QuizReply, QuizError> {
        let mut guard = self.sessions.lock(user_id).await;
        let session = guard
            .session_mut()
            .ok_or_else(|| QuizError::unexpected("submit_answer", SessionPhase::Idle))?;

        let feedback = session.submit_answer(answer)?;
        let next = match session.result() {
            Some(result) => {
                log::info!(
                    "user {user_id}: finished {} quiz with {}/{}",
                    result.category,
                    result.score,
                    result.total
                );
                NextStep::Completed(result)
            }
            None => NextStep::Question(self.prepare_next(session).await?),
        };
        Ok(QuizReply::Answered { feedback, next })
    }

    /// Drop the user's session from any state. Always succeeds.
    pub async fn stop(&self, user_id: UserId) -> QuizReply {
        let removed = self.sessions.lock(user_id).await.take();
        if let Some(session) = &removed {
            log::info!("user {user_id}: stopped while {}", session.phase());
        }
        QuizReply::Stopped {
            had_session: removed.is_some(),
        }
    }

    /// Drop the user's session and ask for a language again.
    pub async fn restart(&self, user_id: UserId) -> QuizReply {
        let removed = self.sessions.lock(user_id).await.take();
        if let Some(session) = removed {
            log::debug!("user {user_id}: restarting from {}", session.phase());
        }
        QuizReply::choose_language()
    }

    async fn prepare_next(&self, session: &mut Session) -> Result<QuestionPrompt, QuizError> {
        let lang = session.lang();
        let phase = session.phase();
        let run = session
            .run_mut()
            .ok_or_else(|| QuizError::unexpected("prepare_question", phase))?;
        let correct = run
            .upcoming()
            .map(|q| q.answer().to_string())
            .ok_or_else(|| QuizError::unexpected("prepare_question", phase))?;

        let options = self.distractors.build_options(&correct, run.category()).await;
        let number = run.current_index() + 1;
        let total = run.total();
        let pending = run.prepare(options)?;

        Ok(QuestionPrompt {
            lang,
            number,
            total,
            text: pending.text().to_string(),
            options: pending.options().to_vec(),
        })
    }
}
