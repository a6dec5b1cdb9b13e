//! Limit/offset paging for post listings

/// Maximum rows per request
const MAX_LIMIT: i64 = 100;

/// Default rows per request
const DEFAULT_LIMIT: i64 = 20;

/// Validated limit/offset pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    limit: i64,
    offset: i64,
}

impl ListQuery {
    /// Create a list query with clamping.
    ///
    /// - limit is clamped to 1..=100 (default 20)
    /// - offset is clamped to a minimum of 0 (default 0)
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Build from optional wire parameters, filling defaults.
    pub fn from_options(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self::new(limit.unwrap_or(DEFAULT_LIMIT), offset.unwrap_or(0))
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
