//! Document repository implementation.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use docqa_core::{CreateDocumentRequest, Document, DocumentRepository, Error, Result};

/// PostgreSQL implementation of DocumentRepository.
#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

impl PgDocumentRepository {
    /// Create a new PgDocumentRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_document(row: PgRow) -> Document {
    Document {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, req: CreateDocumentRequest) -> Result<Document> {
        req.validate()?;

        let row = sqlx::query(
            "INSERT INTO documents (title, content)
             VALUES ($1, $2)
             RETURNING id, title, content, created_at, updated_at",
        )
        .bind(&req.title)
        .bind(&req.content)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(map_document(row))
    }

    async fn fetch(&self, id: i64) -> Result<Document> {
        let row = sqlx::query(
            "SELECT id, title, content, created_at, updated_at
             FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_document).ok_or(Error::DocumentNotFound(id))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT id, title, content, created_at, updated_at
             FROM documents
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_document).collect())
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM documents")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("n"))
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM documents WHERE id = $1) AS found")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("found"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Questions go with the document via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::DocumentNotFound(id));
        }
        Ok(())
    }
}
