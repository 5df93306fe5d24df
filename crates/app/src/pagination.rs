//! Page arithmetic shared by the services and the gateway.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// A page window that has already been clamped into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Clamp caller-supplied values: a non-positive page becomes the first
    /// page, a non-positive limit becomes the default and an oversized limit
    /// is capped.
    pub fn clamped(page: i64, limit: i64) -> Self {
        let page = if page <= 0 {
            DEFAULT_PAGE
        } else {
            u32::try_from(page).unwrap_or(u32::MAX)
        };

        let limit = if limit <= 0 {
            DEFAULT_LIMIT
        } else {
            u32::try_from(limit).map_or(MAX_LIMIT, |limit| limit.min(MAX_LIMIT))
        };

        Self { page, limit }
    }

    pub const fn page(self) -> u32 {
        self.page
    }

    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }
}

/// `ceil(total / limit)`; zero when either side is zero.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }

    total.div_ceil(u64::from(limit))
}
