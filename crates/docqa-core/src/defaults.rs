//! Centralized default constants for the docqa system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// QUESTION PROCESSING
// =============================================================================

/// Simulated answer-generation delay in seconds (placeholder for real
/// inference). Overridable via `ANSWER_DELAY_SECS`.
pub const ANSWER_DELAY_SECS: u64 = 5;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum characters for a document title (matches VARCHAR(255)).
pub const MAX_TITLE_LEN: usize = 255;

// =============================================================================
// UPLOADS & EXTRACTION
// =============================================================================

/// Maximum accepted request body size for file uploads, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Timeout for external extraction commands (pdftotext, pandoc), in seconds.
pub const EXTRACTION_CMD_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints.
pub const PAGE_LIMIT: i64 = 50;

/// Maximum accepted page size for list endpoints.
pub const PAGE_LIMIT_MAX: i64 = 200;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;
