//! Success envelopes wrapping every JSON payload.

use pagination::{Page, Pagination};
use serde::Serialize;
use utoipa::ToSchema;

/// `{success: true, data}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{success: true, count, data}` where `count` is the length of `data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListEnvelope<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// `{success: true, count, pagination, data}` for one page of results.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageEnvelope<T> {
    pub success: bool,
    /// Items on this page.
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<T>,
}

impl<T> From<Page<T>> for PageEnvelope<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            success: true,
            count: page.items.len(),
            pagination: page.pagination,
            data: page.items,
        }
    }
}
