use serde::{Deserialize, Serialize};

/// Page size used when a listing request does not name one.
pub const DEFAULT_LIMIT: u32 = 12;

/// Upper bound on the page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// A validated `page`/`limit` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a page request from raw query values, clamping `page` to at least 1
    /// and `limit` to `1..=MAX_LIMIT`.
    pub fn from_params(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, u32::MAX as i64) as u32;
        let limit = limit
            .unwrap_or(DEFAULT_LIMIT as i64)
            .clamp(1, MAX_LIMIT as i64) as u32;
        Self { page, limit }
    }

    /// Number of records to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Slices an already filtered and ordered collection down to this page.
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.limit as usize)
            .collect();
        Page::new(items, total, *self)
    }
}

/// One page of a listing together with the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    pub fn meta(&self) -> PaginationMeta {
        let limit = self.request.limit.max(1) as u64;
        PaginationMeta {
            current_page: self.request.page,
            total_pages: self.total.div_ceil(limit),
            total_items: self.total,
            items_per_page: self.request.limit,
        }
    }
}

/// Pagination block attached to every listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u32,
}
