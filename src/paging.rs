//! Pagination math and the paged-response wire shape.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// A page request resolved against a total record count.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub pages: i64,
    pub size: i64,
    pub records: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(page: i64, size: i64, records: i64) -> Self {
        let pages = if size > 0 && records > 0 {
            records / size + i64::from(records % size != 0)
        } else {
            0
        };
        let offset = page.saturating_sub(1).saturating_mul(size);
        Self { page, pages, size, records, limit: size, offset }
    }

    /// False when there is nothing to page or `page` is out of range.
    pub fn is_valid(&self) -> bool {
        self.pages > 0 && self.page > 0 && self.size > 0 && self.page <= self.pages
    }
}

/// One page of results as sent to clients.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageDto<T> {
    pub page: i64,
    pub pages: i64,
    pub size: i64,
    pub records: i64,
    pub content: Vec<T>,
}

impl<T> PageDto<T> {
    pub fn new(pagination: Pagination, content: Vec<T>) -> Self {
        Self {
            page: pagination.page,
            pages: pagination.pages,
            size: pagination.size,
            records: pagination.records,
            content,
        }
    }

    pub fn empty() -> Self {
        Self { page: 0, pages: 0, size: 0, records: 0, content: Vec::new() }
    }
}
