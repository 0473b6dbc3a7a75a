//! Question repository implementation.
//!
//! Status transition writes are fenced on `status = 'pending'`: a background
//! unit that lost a race with deletion touches zero rows instead of
//! resurrecting or overwriting terminal state.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use docqa_core::{Error, Question, QuestionRepository, QuestionStatus, Result};

/// PostgreSQL implementation of QuestionRepository.
#[derive(Clone)]
pub struct PgQuestionRepository {
    pool: Pool<Postgres>,
}

impl PgQuestionRepository {
    /// Create a new PgQuestionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_question(row: PgRow) -> Result<Question> {
    let status: String = row.get("status");
    Ok(Question {
        id: row.get("id"),
        document_id: row.get("document_id"),
        question: row.get("question"),
        answer: row.get("answer"),
        status: QuestionStatus::parse(&status)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn insert(&self, document_id: i64, question: &str) -> Result<Question> {
        let row = sqlx::query(
            "INSERT INTO questions (document_id, question, status)
             VALUES ($1, $2, $3)
             RETURNING id, document_id, question, answer, status, created_at, updated_at",
        )
        .bind(document_id)
        .bind(question)
        .bind(QuestionStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        map_question(row)
    }

    async fn fetch(&self, id: i64) -> Result<Question> {
        let row = sqlx::query(
            "SELECT id, document_id, question, answer, status, created_at, updated_at
             FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => map_question(row),
            None => Err(Error::QuestionNotFound(id)),
        }
    }

    async fn list_for_document(&self, document_id: i64) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            "SELECT id, document_id, question, answer, status, created_at, updated_at
             FROM questions
             WHERE document_id = $1
             ORDER BY created_at DESC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(map_question).collect()
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1) AS found")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("found"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::QuestionNotFound(id));
        }
        Ok(())
    }

    async fn mark_answered(&self, id: i64, answer: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE questions
             SET answer = $2, status = $3, updated_at = $4
             WHERE id = $1 AND status = $5",
        )
        .bind(id)
        .bind(answer)
        .bind(QuestionStatus::Answered.as_str())
        .bind(Utc::now())
        .bind(QuestionStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_error(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE questions
             SET status = $2, updated_at = $3
             WHERE id = $1 AND status = $4",
        )
        .bind(id)
        .bind(QuestionStatus::Error.as_str())
        .bind(Utc::now())
        .bind(QuestionStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("n"))
    }
}
