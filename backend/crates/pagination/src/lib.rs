//! Page/limit pagination primitives shared by list endpoints.
//!
//! List endpoints accept `page` and `limit` query parameters, count the
//! matching rows and answer with a pagination envelope:
//!
//! ```json
//! {"page": 2, "limit": 12, "total": 30, "totalPages": 3}
//! ```
//!
//! Query values are parsed leniently: anything that is not a positive integer
//! falls back to the default, and limits are capped at [`MAX_LIMIT`].
//!
//! # Example
//!
//! ```
//! use pagination::{PageRequest, Pagination};
//!
//! let request = PageRequest::from_query(Some("2"), None, 12);
//! assert_eq!(request.offset(), 12);
//!
//! let envelope = Pagination::new(request, 30);
//! assert_eq!(envelope.total_pages, 3);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Page size used when a list endpoint does not choose its own default.
pub const DEFAULT_LIMIT: u32 = 12;

/// A validated page request: `page >= 1` and `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request, clamping `page` to at least 1 and `limit` into
    /// `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Parse raw query values, substituting page 1 and `default_limit` for
    /// anything missing or not a positive integer.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>, default_limit: u32) -> Self {
        Self::new(
            page.and_then(parse_positive).unwrap_or(1),
            limit.and_then(parse_positive).unwrap_or(default_limit),
        )
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding the page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_LIMIT)
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

/// Pagination envelope returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,
    /// Page size used for the query.
    pub limit: u32,
    /// Total number of matching items.
    pub total: u64,
    /// Number of pages needed to show every matching item.
    pub total_pages: u64,
}

impl Pagination {
    /// Describe `request` against `total` matching items.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages: total.div_ceil(u64::from(request.limit())),
        }
    }
}

/// A page of items together with its envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page, in query order.
    pub items: Vec<T>,
    /// Envelope describing the page.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Pair items with the envelope for `request` and `total`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total),
        }
    }

    /// Transform every item while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
