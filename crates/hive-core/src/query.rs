//! Pagination and ordering shared by every list operation.

use crate::errors::{HiveError, Result};
use serde::{Deserialize, Serialize};

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;
/// Page size used when the caller does not choose one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first
    Asc,
    /// Largest first
    #[default]
    Desc,
}

/// 1-based page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Validated page selector
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        let request = Self { page, page_size };
        request.validate()?;
        Ok(request)
    }

    /// Check `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE`
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(HiveError::validation("page", "must be at least 1"));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(HiveError::validation(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        Ok(())
    }

    /// Number of items skipped before this page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }

    /// Cut an already filtered and ordered result set down to this page.
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size as usize)
            .collect();
        Page {
            items,
            page: self.page,
            page_size: self.page_size,
            total,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Matching items across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` items
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}
