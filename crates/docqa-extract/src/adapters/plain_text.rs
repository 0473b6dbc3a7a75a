//! Plain text adapter - handles `.txt` uploads.

use async_trait::async_trait;

use docqa_core::{DocumentFormat, FormatExtractor, Result};

/// Adapter for plain text files.
///
/// Reads bytes as UTF-8 (with lossy conversion for invalid sequences).
pub struct PlainTextExtractor;

#[async_trait]
impl FormatExtractor for PlainTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::PlainText
    }

    fn name(&self) -> &str {
        "plain_text"
    }

    async fn extract(&self, data: &[u8], _filename: &str) -> Result<String> {
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}
