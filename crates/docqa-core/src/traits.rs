//! Repository and extractor trait definitions.
//!
//! The database crate provides PostgreSQL implementations; the lifecycle
//! manager and tests depend only on these traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CreateDocumentRequest, Document, DocumentFormat, Question};

/// Storage operations for documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document, validating field constraints.
    async fn insert(&self, req: CreateDocumentRequest) -> Result<Document>;

    /// Fetch a document by id.
    async fn fetch(&self, id: i64) -> Result<Document>;

    /// List documents newest-first with limit/offset pagination.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Document>>;

    /// Total number of documents.
    async fn count(&self) -> Result<i64>;

    /// Check if a document exists.
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Delete a document; its questions are removed by the FK cascade.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Storage operations for questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a new question in pending status for the given document.
    async fn insert(&self, document_id: i64, question: &str) -> Result<Question>;

    /// Fetch a question by id.
    async fn fetch(&self, id: i64) -> Result<Question>;

    /// List a document's questions, newest first.
    async fn list_for_document(&self, document_id: i64) -> Result<Vec<Question>>;

    /// Check if a question exists.
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Delete a question.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Record a successful answer, moving the question to answered.
    ///
    /// The write is fenced: only a row still in pending status is touched.
    /// Returns false when the question was deleted or already terminal, so
    /// a late background unit cannot resurrect or overwrite state.
    async fn mark_answered(&self, id: i64, answer: &str) -> Result<bool>;

    /// Move a pending question to error status. Fenced like `mark_answered`.
    async fn mark_error(&self, id: i64) -> Result<bool>;

    /// Total number of questions.
    async fn count(&self) -> Result<i64>;
}

/// Single-contract text extraction for one upload format.
#[async_trait]
pub trait FormatExtractor: Send + Sync {
    /// The format this extractor handles.
    fn format(&self) -> DocumentFormat;

    /// Short adapter name for logging.
    fn name(&self) -> &str;

    /// Extract plain text from raw file bytes.
    async fn extract(&self, data: &[u8], filename: &str) -> Result<String>;
}
