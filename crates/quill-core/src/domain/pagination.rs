//! Pagination window and paged results.

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_ITEMS: u64 = 10;

/// A validated `(page, page_items)` window. Both are always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    page_items: u64,
}

impl Pagination {
    /// Build a window from raw query values.
    ///
    /// Missing or non-positive values fall back to [`DEFAULT_PAGE`] and
    /// [`DEFAULT_PAGE_ITEMS`].
    pub fn new(page: Option<i64>, page_items: Option<i64>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            page_items: positive_or(page_items, DEFAULT_PAGE_ITEMS),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_items(&self) -> u64 {
        self.page_items
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_items)
    }

    /// Maximum number of rows to return.
    pub fn limit(&self) -> u64 {
        self.page_items
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total_pages(total, self.page_items)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

fn positive_or(value: Option<i64>, default: u64) -> u64 {
    match value {
        Some(v) if v > 0 => v as u64,
        _ => default,
    }
}

/// `ceil(total / page_items)`; zero when there is nothing to show.
pub fn total_pages(total: u64, page_items: u64) -> u64 {
    if page_items == 0 {
        return 0;
    }
    total.div_ceil(page_items)
}

/// One page of an ordered result set plus the size of the whole set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Transform every item, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
