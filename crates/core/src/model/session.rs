use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{Category, Language, Question, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("{event} is not accepted while the session is {phase}")]
    UnexpectedEvent {
        event: &'static str,
        phase: SessionPhase,
    },

    #[error("no question is waiting for an answer")]
    NoPendingQuestion,

    #[error("a quiz needs at least one question")]
    NoQuestions,
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle position, used for logging and error reporting.
///
/// `Idle` has no session record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    LanguageChosen,
    CategoryChosen,
    InProgress,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::LanguageChosen => "waiting for a category",
            SessionPhase::CategoryChosen => "waiting for a question count",
            SessionPhase::InProgress => "in progress",
            SessionPhase::Completed => "completed",
        };
        f.write_str(s)
    }
}

//
// ─── RUN ───────────────────────────────────────────────────────────────────────
//

/// The question currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuestion {
    text: String,
    correct_answer: String,
    options: Vec<String>,
}

impl PendingQuestion {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// An active quiz: a fixed list of questions walked in order.
///
/// Holds `score <= current_index <= questions.len()`. The question list is
/// never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRun {
    lang: Language,
    category: Category,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    pending: Option<PendingQuestion>,
}

impl QuizRun {
    /// # Errors
    ///
    /// Returns `SessionStateError::NoQuestions` if `questions` is empty.
    pub fn new(
        lang: Language,
        category: Category,
        questions: Vec<Question>,
    ) -> Result<Self, SessionStateError> {
        if questions.is_empty() {
            return Err(SessionStateError::NoQuestions);
        }
        Ok(Self {
            lang,
            category,
            questions,
            current_index: 0,
            score: 0,
            pending: None,
        })
    }

    #[must_use]
    pub fn lang(&self) -> Language {
        self.lang
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingQuestion> {
        self.pending.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// The question that will be shown next, if any remain.
    #[must_use]
    pub fn upcoming(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Marks the upcoming question as shown with the given answer options.
    ///
    /// Re-preparing an already pending question replaces its options.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NoPendingQuestion` once every question has been answered.
    pub fn prepare(&mut self, options: Vec<String>) -> Result<&PendingQuestion, SessionStateError> {
        let question = self
            .questions
            .get(self.current_index)
            .ok_or(SessionStateError::NoPendingQuestion)?;
        let pending = PendingQuestion {
            text: question.text().to_string(),
            correct_answer: question.answer().to_string(),
            options,
        };
        Ok(&*self.pending.insert(pending))
    }

    fn answer(&mut self, text: &str) -> Result<AnswerOutcome, SessionStateError> {
        let pending = self
            .pending
            .take()
            .ok_or(SessionStateError::NoPendingQuestion)?;
        let correct = text == pending.correct_answer;
        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        Ok(AnswerOutcome {
            correct,
            correct_answer: pending.correct_answer,
            score: self.score,
            total: self.total(),
            session_complete: self.is_finished(),
        })
    }

    fn result(&self) -> QuizResult {
        QuizResult {
            lang: self.lang,
            category: self.category,
            score: self.score,
            total: self.total(),
        }
    }
}

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub score: usize,
    pub total: usize,
    pub session_complete: bool,
}

/// Final score of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub lang: Language,
    pub category: Category,
    pub score: usize,
    pub total: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Per-state data. Each variant carries only what is valid in that state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    LanguageChosen { lang: Language },
    CategoryChosen { lang: Language, category: Category },
    InProgress(QuizRun),
    Completed(QuizResult),
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::LanguageChosen { .. } => SessionPhase::LanguageChosen,
            SessionState::CategoryChosen { .. } => SessionPhase::CategoryChosen,
            SessionState::InProgress(_) => SessionPhase::InProgress,
            SessionState::Completed(_) => SessionPhase::Completed,
        }
    }
}

/// One user's quiz attempt. Created when a language is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: UserId,
    state: SessionState,
}

impl Session {
    #[must_use]
    pub fn new(user_id: UserId, lang: Language) -> Self {
        Self {
            user_id,
            state: SessionState::LanguageChosen { lang },
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn lang(&self) -> Language {
        match &self.state {
            SessionState::LanguageChosen { lang } | SessionState::CategoryChosen { lang, .. } => {
                *lang
            }
            SessionState::InProgress(run) => run.lang(),
            SessionState::Completed(result) => result.lang,
        }
    }

    #[must_use]
    pub fn run(&self) -> Option<&QuizRun> {
        match &self.state {
            SessionState::InProgress(run) => Some(run),
            _ => None,
        }
    }

    pub fn run_mut(&mut self) -> Option<&mut QuizRun> {
        match &mut self.state {
            SessionState::InProgress(run) => Some(run),
            _ => None,
        }
    }

    /// `LanguageChosen -> CategoryChosen`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::UnexpectedEvent` from any other state.
    pub fn choose_category(&mut self, category: Category) -> Result<(), SessionStateError> {
        match self.state {
            SessionState::LanguageChosen { lang } => {
                self.state = SessionState::CategoryChosen { lang, category };
                Ok(())
            }
            _ => Err(self.unexpected("choose_category")),
        }
    }

    /// `CategoryChosen -> InProgress` with the drawn questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::UnexpectedEvent` outside `CategoryChosen`,
    /// or `SessionStateError::NoQuestions` for an empty draw. The session is
    /// unchanged on error.
    pub fn begin(&mut self, questions: Vec<Question>) -> Result<(), SessionStateError> {
        let SessionState::CategoryChosen { lang, category } = self.state else {
            return Err(self.unexpected("choose_count"));
        };
        self.state = SessionState::InProgress(QuizRun::new(lang, category, questions)?);
        Ok(())
    }

    /// Scores the pending question. Moves to `Completed` after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::UnexpectedEvent` outside `InProgress` and
    /// `SessionStateError::NoPendingQuestion` if no question has been shown.
    pub fn submit_answer(&mut self, text: &str) -> Result<AnswerOutcome, SessionStateError> {
        let SessionState::InProgress(run) = &mut self.state else {
            return Err(self.unexpected("submit_answer"));
        };
        let outcome = run.answer(text)?;
        if run.is_finished() {
            let result = run.result();
            self.state = SessionState::Completed(result);
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        match &self.state {
            SessionState::Completed(result) => Some(*result),
            _ => None,
        }
    }

    fn unexpected(&self, event: &'static str) -> SessionStateError {
        SessionStateError::UnexpectedEvent {
            event,
            phase: self.phase(),
        }
    }
}
