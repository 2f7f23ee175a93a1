mod catalog;
mod event;
mod ids;
mod question;
mod session;

pub use catalog::{Category, Language, QuestionCount};
pub use event::QuizEvent;
pub use ids::UserId;
pub use question::Question;
pub use session::{
    AnswerOutcome, PendingQuestion, QuizResult, QuizRun, Session, SessionPhase, SessionState,
    SessionStateError,
};
