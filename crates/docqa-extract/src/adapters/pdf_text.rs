//! PDF adapter — extracts text using `pdftotext` (poppler-utils).

use std::io::Write;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::debug;

use docqa_core::defaults::EXTRACTION_CMD_TIMEOUT_SECS;
use docqa_core::{DocumentFormat, Error, FormatExtractor, Result};

use super::run_cmd_with_timeout;

/// Adapter for extracting text from PDF files using `pdftotext`.
///
/// The upload is written to a tempfile and each `pdftotext` invocation is
/// guarded by a per-command timeout.
pub struct PdfTextExtractor;

#[async_trait]
impl FormatExtractor for PdfTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn name(&self) -> &str {
        "pdf_text"
    }

    async fn extract(&self, data: &[u8], filename: &str) -> Result<String> {
        let mut tmp = NamedTempFile::new()
            .map_err(|e| Error::Extraction(format!("Failed to create tempfile: {}", e)))?;
        tmp.write_all(data)
            .map_err(|e| Error::Extraction(format!("Failed to write tempfile: {}", e)))?;

        debug!(
            subsystem = "extract",
            component = "pdf_text",
            op = "extract",
            filename,
            bytes = data.len(),
            "Running pdftotext"
        );

        // `-` sends extracted text to stdout.
        let mut cmd = Command::new("pdftotext");
        cmd.arg(tmp.path()).arg("-");
        let text = run_cmd_with_timeout(&mut cmd, EXTRACTION_CMD_TIMEOUT_SECS).await?;

        Ok(text)
    }
}
