//! Standard response wrappers.

use serde::{Deserialize, Serialize};

/// Pagination metadata for list responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// 1-based page number
    pub page: i64,
    /// Maximum number of items per page
    pub limit: i64,
    /// Number of items skipped
    pub offset: i64,
    /// True if more items are available after this page
    pub has_more: bool,
}

/// List response wrapper with pagination metadata.
///
/// ```json
/// {
///   "data": [...],
///   "pagination": {"total": 120, "page": 1, "limit": 50, "offset": 0, "hasMore": true}
/// }
/// ```
#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T: Serialize> ListResponse<T> {
    /// `has_more` is derived from offset, page length and total.
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64, offset: i64) -> Self {
        let has_more = offset + (data.len() as i64) < total;
        Self {
            data,
            pagination: PaginationMeta {
                total,
                page,
                limit,
                offset,
                has_more,
            },
        }
    }
}
