#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryQuestionStore, QuestionRecord, QuestionStore, Storage, StorageError};
