//! Listing filters and paged results.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;
pub const EMPTY_MESSAGE: &str = "No records found";

/// Query string accepted by every list endpoint. Fields an entity does not
/// know about are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub search: Option<String>,
    pub barangay_id: Option<i64>,
    pub status: Option<String>,
    pub submission_status: Option<String>,
    pub route_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListFilter {
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .filter(|p| *p > 0)
            .map(|p| p.min(MAX_PER_PAGE))
            .unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, filter: &ListFilter) -> Self {
        let per_page = filter.per_page();
        let total_pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
        let message = items.is_empty().then(|| EMPTY_MESSAGE.to_string());

        Self {
            items,
            total,
            page: filter.page(),
            per_page,
            total_pages,
            message,
        }
    }
}
