//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Page;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// Number of participants matching the filters.
    pub total_items: usize,
    /// Total number of pages.
    pub total_pages: usize,
}

impl From<&Page> for PaginationMeta {
    fn from(page: &Page) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Wraps `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
