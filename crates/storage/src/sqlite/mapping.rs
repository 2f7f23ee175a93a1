use quiz_core::model::{Category, Language, Question};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{QuestionRecord, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    Ok(Question::new(
        row.try_get::<String, _>("text").map_err(ser)?,
        row.try_get::<String, _>("answer").map_err(ser)?,
    ))
}

pub(crate) fn map_answer_row(row: &SqliteRow) -> Result<String, StorageError> {
    row.try_get::<String, _>("answer").map_err(ser)
}

/// Full row including filter columns. Rows with codes outside the known sets are rejected.
pub(crate) fn map_record_row(row: &SqliteRow) -> Result<QuestionRecord, StorageError> {
    let category: Category = row
        .try_get::<String, _>("category")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let lang: Language = row
        .try_get::<String, _>("lang")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    Ok(QuestionRecord {
        category,
        lang,
        text: row.try_get("text").map_err(ser)?,
        answer: row.try_get("answer").map_err(ser)?,
    })
}

/// Maps a query failure, separating a missing table from other errors.
pub(crate) fn query_error(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.message().contains("no such table") => {
            StorageError::Unavailable(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Unavailable(e.to_string())
        }
        _ => StorageError::Connection(e.to_string()),
    }
}
