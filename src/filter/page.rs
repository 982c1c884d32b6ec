use serde::Serialize;

use crate::config::SearchConfig;

/// Requested page, 1-based. Both values are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Absent, non-numeric and non-positive values are treated as not provided
    pub fn from_params(page: Option<&str>, size: Option<&str>, config: &SearchConfig) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let mut size = parse_positive(size).unwrap_or(config.default_page_size.max(1));
        if let Some(max) = config.max_page_size {
            if size > max {
                tracing::debug!("Page size {} exceeds max {}, capping", size, max);
                size = max;
            }
        }
        Self { page, size }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// Rows to skip, or `None` when that count does not fit in an `i64`
    pub fn offset(&self) -> Option<i64> {
        i64::from(self.page - 1).checked_mul(i64::from(self.size))
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n > 0)
}

/// One page of a result set plus the counts reported in `meta`
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
}

impl<T> Page<T> {
    pub fn new(rows: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            rows,
            total,
            per_page: request.size,
            current_page: request.page,
        }
    }

    pub fn last_page(&self) -> u64 {
        let per_page = u64::from(self.per_page.max(1));
        self.total.div_ceil(per_page).max(1)
    }

    pub fn meta(&self) -> PageMeta {
        PageMeta {
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u64,
}
