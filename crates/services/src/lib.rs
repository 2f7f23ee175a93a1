#![forbid(unsafe_code)]

pub mod app_services;
pub mod controller;
pub mod distractors;
pub mod error;
pub mod questions;
pub mod sessions;

pub use quiz_core::Randomness;

pub use app_services::QuizServices;
pub use controller::{NextStep, QuestionPrompt, QuizController, QuizReply};
pub use distractors::DistractorSampler;
pub use error::{AppServicesError, QuestionQueryError, QuizError, Recovery};
pub use questions::QuestionRepository;
pub use sessions::{SessionGuard, SessionStore};
