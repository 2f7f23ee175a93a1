use serde::{Deserialize, Serialize};

use super::{Category, Language, QuestionCount};

/// A discrete user action, decoded once by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum QuizEvent {
    ChooseLanguage(Language),
    ChooseCategory(Category),
    ChooseCount(QuestionCount),
    SubmitAnswer(String),
    Stop,
    Restart,
}

impl QuizEvent {
    /// Short name used in logs and state errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QuizEvent::ChooseLanguage(_) => "choose_language",
            QuizEvent::ChooseCategory(_) => "choose_category",
            QuizEvent::ChooseCount(_) => "choose_count",
            QuizEvent::SubmitAnswer(_) => "submit_answer",
            QuizEvent::Stop => "stop",
            QuizEvent::Restart => "restart",
        }
    }
}
