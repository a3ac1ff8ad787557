//! Pagination parameters shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Default page size
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest page a client may request
pub const MAX_LIMIT: u32 = 100;

/// Query parameters for paginated lists (`?limit=&offset=`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    /// Resolve the optional parameters into a bounded page
    pub fn page(&self) -> Page {
        Page {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as i64,
            offset: self.offset.unwrap_or(0) as i64,
        }
    }
}

/// A resolved, bounded page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Everything, for internal callers that must see the whole set
    pub const ALL: Page = Page {
        limit: i64::MAX,
        offset: 0,
    };

    /// Apply this window to an already ordered iterator
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(0))
            .take(usize::try_from(self.limit).unwrap_or(0))
            .collect()
    }
}
