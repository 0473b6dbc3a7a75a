//! # docqa-extract
//!
//! Text extraction for uploaded document files.
//!
//! Each supported format has one adapter implementing the
//! [`FormatExtractor`](docqa_core::FormatExtractor) contract; the
//! [`ExtractorRegistry`] dispatches on the capability-tagged
//! [`DocumentFormat`](docqa_core::DocumentFormat) and yields an
//! unsupported-format error for anything unregistered.
//!
//! ## Example
//!
//! ```ignore
//! use docqa_extract::ExtractorRegistry;
//! use docqa_core::DocumentFormat;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let text = registry
//!     .extract(DocumentFormat::PlainText, b"hello", "notes.txt")
//!     .await?;
//! ```

pub mod adapters;
pub mod registry;

pub use adapters::{DocxConvertExtractor, PdfTextExtractor, PlainTextExtractor};
pub use registry::ExtractorRegistry;
