//! Page-based pagination for list endpoints.

use serde::Serialize;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_SIZE: u32 = 10;
const MAX_SIZE: u32 = 100;

/// Pagination parameters shared across list endpoints.
///
/// - `page`: ≥ 1, default 1
/// - `size`: 1–100, default 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
        }
    }
}

impl PageRequest {
    /// Build from raw query-string values.
    ///
    /// Missing, non-numeric, or zero values fall back to the defaults;
    /// `size` above 100 is capped rather than rejected.
    pub fn from_query(page: Option<&str>, size: Option<&str>) -> Self {
        let page = page
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_PAGE);
        let size = size
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .map_or(DEFAULT_SIZE, |v| v.min(MAX_SIZE));
        Self { page, size }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}
