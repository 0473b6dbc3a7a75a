//! Standard response envelope types for list endpoints.

use serde::{Deserialize, Serialize};

/// Standardized pagination metadata for list responses.
#[derive(Serialize, Deserialize, Debug, utoipa::ToSchema)]
pub struct PaginationMeta {
    /// Total number of items matching the query (across all pages)
    pub total: i64,
    /// Maximum number of items per page (request parameter)
    pub limit: i64,
    /// Number of items skipped (request parameter)
    pub offset: i64,
    /// True if more items are available after this page
    pub has_more: bool,
}

impl PaginationMeta {
    /// Build pagination metadata from the request window and a total count.
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

/// Standardized list response wrapper with pagination metadata.
#[derive(Serialize, Debug)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_more_when_window_inside_total() {
        let meta = PaginationMeta::new(100, 50, 0);
        assert!(meta.has_more);
    }

    #[test]
    fn test_no_more_on_last_page() {
        let meta = PaginationMeta::new(100, 50, 50);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_no_more_when_total_smaller_than_limit() {
        let meta = PaginationMeta::new(3, 50, 0);
        assert!(!meta.has_more);
    }
}
