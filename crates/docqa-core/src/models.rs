//! Data models for documents, questions, and upload formats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::MAX_TITLE_LEN;
use crate::error::{Error, Result};

/// An uploaded document that questions can be asked against.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lifecycle status of a question.
///
/// A question is created `Pending` and moves exactly once to `Answered`
/// or `Error`. Terminal statuses are never left.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    Pending,
    Answered,
    Error,
}

impl QuestionStatus {
    /// Database representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Answered => "answered",
            QuestionStatus::Error => "error",
        }
    }

    /// Parse a database representation back into a status.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(QuestionStatus::Pending),
            "answered" => Ok(QuestionStatus::Answered),
            "error" => Ok(QuestionStatus::Error),
            other => Err(Error::Internal(format!(
                "Unknown question status in database: {}",
                other
            ))),
        }
    }

    /// True for `Answered` and `Error`, the states no transition leaves.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, QuestionStatus::Pending)
    }
}

impl std::fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question submitted against a document.
///
/// `answer` is null until the background unit records a result; `Answered`
/// implies a present answer, `Pending` implies an absent one.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Question {
    pub id: i64,
    pub document_id: i64,
    pub question: String,
    pub answer: Option<String>,
    pub status: QuestionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request to create a document from raw title/content fields.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
}

impl CreateDocumentRequest {
    /// Validate field constraints before hitting the database.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".into()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::InvalidInput(format!(
                "title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }
        if self.content.trim().is_empty() {
            return Err(Error::InvalidInput("content must not be empty".into()));
        }
        Ok(())
    }
}

/// Request to submit a question against a document.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateQuestionRequest {
    pub question: String,
}

impl CreateQuestionRequest {
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::InvalidInput("question must not be empty".into()));
        }
        Ok(())
    }
}

/// Capability tag selecting the extraction adapter for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the declared format from a filename extension.
    ///
    /// Returns `None` for unrecognized extensions; callers surface that as
    /// an unsupported-format client error before any adapter runs.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(DocumentFormat::PlainText),
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "plain_text",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            QuestionStatus::Pending,
            QuestionStatus::Answered,
            QuestionStatus::Error,
        ] {
            assert_eq!(QuestionStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_unknown() {
        assert!(QuestionStatus::parse("cancelled").is_err());
        assert!(QuestionStatus::parse("").is_err());
    }

    #[test]
    fn test_status_terminal() {
        assert!(!QuestionStatus::Pending.is_terminal());
        assert!(QuestionStatus::Answered.is_terminal());
        assert!(QuestionStatus::Error.is_terminal());
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&QuestionStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let parsed: QuestionStatus = serde_json::from_str("\"answered\"").unwrap();
        assert_eq!(parsed, QuestionStatus::Answered);
    }

    #[test]
    fn test_create_document_valid() {
        let req = CreateDocumentRequest {
            title: "T".into(),
            content: "C".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_document_empty_title() {
        let req = CreateDocumentRequest {
            title: "   ".into(),
            content: "C".into(),
        };
        assert!(matches!(req.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_create_document_oversized_title() {
        let req = CreateDocumentRequest {
            title: "x".repeat(MAX_TITLE_LEN + 1),
            content: "C".into(),
        };
        assert!(matches!(req.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_create_document_title_at_limit() {
        let req = CreateDocumentRequest {
            title: "x".repeat(MAX_TITLE_LEN),
            content: "C".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_document_empty_content() {
        let req = CreateDocumentRequest {
            title: "T".into(),
            content: "".into(),
        };
        assert!(matches!(req.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_create_question_empty() {
        let req = CreateQuestionRequest {
            question: " \n".into(),
        };
        assert!(matches!(req.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            DocumentFormat::from_filename("notes.txt"),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(
            DocumentFormat::from_filename("paper.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_filename("report.docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::from_filename("sheet.xlsx"), None);
        assert_eq!(DocumentFormat::from_filename("noextension"), None);
    }

    #[test]
    fn test_format_from_filename_multiple_dots() {
        assert_eq!(
            DocumentFormat::from_filename("archive.2024.final.txt"),
            Some(DocumentFormat::PlainText)
        );
    }
}
