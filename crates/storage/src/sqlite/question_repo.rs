use std::collections::BTreeSet;

use quiz_core::model::{Category, Language, Question};

use super::SqliteRepository;
use super::mapping::{map_answer_row, map_question_row, map_record_row, query_error};
use crate::repository::{QuestionRecord, QuestionStore, StorageError};

#[async_trait::async_trait]
impl QuestionStore for SqliteRepository {
    async fn check_available(&self) -> Result<(), StorageError> {
        let row = sqlx::query(
            r"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name = 'questions'
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        if row.is_none() {
            log::warn!("question store has no questions table");
            return Err(StorageError::Unavailable("questions table missing".into()));
        }
        Ok(())
    }

    async fn questions_for(
        &self,
        category: Category,
        lang: Language,
    ) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT text, answer FROM questions
            WHERE category = ?1 AND lang = ?2
            ORDER BY id ASC
            ",
        )
        .bind(category.as_str())
        .bind(lang.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(&row)?);
        }
        Ok(questions)
    }

    async fn distinct_answers(&self, category: Category) -> Result<BTreeSet<String>, StorageError> {
        let rows = sqlx::query("SELECT DISTINCT answer FROM questions WHERE category = ?1")
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        rows.iter().map(map_answer_row).collect()
    }
}

impl SqliteRepository {
    /// Insert one question row and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the insert fails.
    pub async fn insert_question(&self, record: &QuestionRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO questions (category, lang, text, answer)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(record.category.as_str())
        .bind(record.lang.as_str())
        .bind(record.text.as_str())
        .bind(record.answer.as_str())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(res.last_insert_rowid())
    }

    /// Remove every question row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear_questions(&self) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM questions")
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        Ok(res.rows_affected())
    }

    /// Every stored row, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for rows with unknown category or language codes.
    pub async fn list_records(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        let rows = sqlx::query("SELECT category, lang, text, answer FROM questions ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)?;

        rows.iter().map(map_record_row).collect()
    }
}
