//! Request query parameter types

use serde::Deserialize;

/// Listing query parameters (`?q=&sort=&page=&page_size=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Search term: a date (`2021`, `2021-03`, `2021-03-04`, `04.03.2021`,
    /// `04/03/2021`) or free text
    pub q: Option<String>,
    /// Sort key, `-` prefix for descending
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Pagination after defaults and clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Missing or zero page becomes 1; page size falls back to
    /// `default_size` and is clamped to `1..=max_size`.
    pub fn resolve(page: Option<u32>, page_size: Option<u32>, default_size: u32, max_size: u32) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let page_size = page_size.unwrap_or(default_size).clamp(1, max_size.max(1));
        Self { page, page_size }
    }

    /// Calculate offset for SQL queries
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Get limit for SQL queries
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// Tree view query (`?root=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeParams {
    pub root: Option<i64>,
}
