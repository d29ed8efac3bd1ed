//! Skip/limit pagination.

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest page, limit or offset handed to storage. SQL binds these as BIGINT.
pub const MAX_WINDOW: u64 = i64::MAX as u64;

/// A requested page. Both values are at least 1 and at most [`MAX_WINDOW`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Build a request, falling back to the defaults for missing or zero values.
    /// Oversized values are capped at [`MAX_WINDOW`].
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page
                .filter(|p| *p >= 1)
                .unwrap_or(DEFAULT_PAGE)
                .min(MAX_WINDOW),
            limit: limit
                .filter(|l| *l >= 1)
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_WINDOW),
        }
    }

    /// Number of items to skip.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_WINDOW)
    }

    /// `(offset, limit)` as handed to storage, both within [`MAX_WINDOW`].
    pub fn window(&self) -> (u64, u64) {
        (self.offset(), self.limit.min(MAX_WINDOW))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit)
    }
}
