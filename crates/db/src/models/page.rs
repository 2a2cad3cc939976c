//! Paged listing search: query parameters and the result envelope.

use serde::{Deserialize, Serialize};

use proplens_core::types::Timestamp;

use crate::models::status::{ListingStatus, PropertyType, SaleCategory};

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Page size ceiling; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A single page of results plus the unpaged total.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Sort direction for the listing search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Filters, sorting, and paging for the scoped listing search.
///
/// `sort_by` is matched case-insensitively against the whitelist
/// title/city/price/bedrooms/createdAt; anything else falls back to
/// created_at descending.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingCaseQuery {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDir>,
    /// Free-text keyword across title/description/street/city/state.
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub property_type: Option<PropertyType>,
    pub sale_category: Option<SaleCategory>,
    pub status: Option<ListingStatus>,
    pub min_bedrooms: Option<i32>,
    pub max_bedrooms: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
}

impl ListingCaseQuery {
    /// Page number floored at 1.
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// Page size clamped to `[1, MAX_PAGE_SIZE]`, defaulting when unset.
    pub fn page_size(&self) -> i64 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size.clamp(1, MAX_PAGE_SIZE)
        }
    }
}
