//! Extractor registry dispatching uploads to format adapters.

use std::collections::HashMap;
use std::sync::Arc;

use docqa_core::{DocumentFormat, Error, FormatExtractor, Result};

use crate::adapters::{DocxConvertExtractor, PdfTextExtractor, PlainTextExtractor};

/// Registry mapping document formats to their extractor implementations.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Arc<dyn FormatExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Create a registry with all built-in adapters registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PlainTextExtractor));
        registry.register(Arc::new(PdfTextExtractor));
        registry.register(Arc::new(DocxConvertExtractor));
        registry
    }

    /// Register an extractor. Replaces any existing adapter for the same format.
    pub fn register(&mut self, extractor: Arc<dyn FormatExtractor>) {
        self.extractors.insert(extractor.format(), extractor);
    }

    /// Extract text using the adapter registered for the given format.
    pub async fn extract(
        &self,
        format: DocumentFormat,
        data: &[u8],
        filename: &str,
    ) -> Result<String> {
        let extractor = self
            .extractors
            .get(&format)
            .ok_or_else(|| Error::UnsupportedFormat(filename.to_string()))?;
        extractor.extract(data, filename).await
    }

    /// List all formats that have registered adapters.
    pub fn available_formats(&self) -> Vec<DocumentFormat> {
        self.extractors.keys().copied().collect()
    }

    /// Check if an adapter is registered for the given format.
    pub fn has_extractor(&self, format: DocumentFormat) -> bool {
        self.extractors.contains_key(&format)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new_is_empty() {
        let registry = ExtractorRegistry::new();
        assert!(registry.available_formats().is_empty());
        assert!(!registry.has_extractor(DocumentFormat::PlainText));
    }

    #[test]
    fn test_registry_register_and_lookup() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Arc::new(PlainTextExtractor));
        assert!(registry.has_extractor(DocumentFormat::PlainText));
        assert!(!registry.has_extractor(DocumentFormat::Pdf));
        assert_eq!(registry.available_formats().len(), 1);
    }

    #[test]
    fn test_registry_with_defaults_covers_all_formats() {
        let registry = ExtractorRegistry::with_defaults();
        for format in [
            DocumentFormat::PlainText,
            DocumentFormat::Pdf,
            DocumentFormat::Docx,
        ] {
            assert!(registry.has_extractor(format));
        }
    }

    #[tokio::test]
    async fn test_registry_extract_missing_adapter() {
        let registry = ExtractorRegistry::new();
        let result = registry
            .extract(DocumentFormat::Pdf, b"data", "test.pdf")
            .await;
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_registry_extract_with_adapter() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Arc::new(PlainTextExtractor));

        let text = registry
            .extract(DocumentFormat::PlainText, b"hello world", "test.txt")
            .await
            .unwrap();
        assert_eq!(text, "hello world");
    }
}
