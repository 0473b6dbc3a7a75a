//! DOCX adapter — converts Word documents to plain text using pandoc.

use std::io::Write;

use async_trait::async_trait;
use tempfile::Builder;
use tokio::process::Command;
use tracing::debug;

use docqa_core::defaults::EXTRACTION_CMD_TIMEOUT_SECS;
use docqa_core::{DocumentFormat, Error, FormatExtractor, Result};

use super::run_cmd_with_timeout;

/// Adapter for extracting text from `.docx` files via `pandoc --to plain`.
pub struct DocxConvertExtractor;

#[async_trait]
impl FormatExtractor for DocxConvertExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn name(&self) -> &str {
        "docx_convert"
    }

    async fn extract(&self, data: &[u8], filename: &str) -> Result<String> {
        let mut tmp = Builder::new()
            .suffix(".docx")
            .tempfile()
            .map_err(|e| Error::Extraction(format!("Failed to create tempfile: {}", e)))?;
        tmp.write_all(data)
            .map_err(|e| Error::Extraction(format!("Failed to write tempfile: {}", e)))?;

        debug!(
            subsystem = "extract",
            component = "docx_convert",
            op = "extract",
            filename,
            bytes = data.len(),
            "Running pandoc"
        );

        let mut cmd = Command::new("pandoc");
        cmd.arg("--from")
            .arg("docx")
            .arg("--to")
            .arg("plain")
            .arg(tmp.path());
        let text = run_cmd_with_timeout(&mut cmd, EXTRACTION_CMD_TIMEOUT_SECS).await?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_docx_invalid_bytes_fail() {
        let extractor = DocxConvertExtractor;
        let result = extractor.extract(b"not a docx", "bogus.docx").await;
        assert!(result.is_err());
    }
}
