//! Error types for docqa.

use thiserror::Error;

/// Result type alias using docqa's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for docqa operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document not found
    #[error("Document with id {0} not found")]
    DocumentNotFound(i64),

    /// Question not found
    #[error("Question with id {0} not found")]
    QuestionNotFound(i64),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File format has no extraction adapter
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Text extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Background task error
    #[error("Task error: {0}")]
    Task(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("test resource".to_string());
        assert_eq!(err.to_string(), "Not found: test resource");
    }

    #[test]
    fn test_error_display_document_not_found() {
        let err = Error::DocumentNotFound(42);
        assert_eq!(err.to_string(), "Document with id 42 not found");
    }

    #[test]
    fn test_error_display_question_not_found() {
        let err = Error::QuestionNotFound(7);
        assert_eq!(err.to_string(), "Question with id 7 not found");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("title must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: title must not be empty");
    }

    #[test]
    fn test_error_display_unsupported_format() {
        let err = Error::UnsupportedFormat("report.xlsx".to_string());
        assert_eq!(err.to_string(), "Unsupported format: report.xlsx");
    }

    #[test]
    fn test_error_display_extraction() {
        let err = Error::Extraction("pdftotext exited non-zero".to_string());
        assert_eq!(err.to_string(), "Extraction error: pdftotext exited non-zero");
    }

    #[test]
    fn test_error_display_task() {
        let err = Error::Task("registry closed".to_string());
        assert_eq!(err.to_string(), "Task error: registry closed");
    }

    #[test]
    fn test_error_display_internal() {
        let err = Error::Internal("unexpected state".to_string());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::DocumentNotFound(1);
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("DocumentNotFound"));
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
