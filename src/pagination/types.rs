//! Pagination types
//!
//! List endpoints return `{count, next, previous, results}`; `next` is an
//! absolute URL to the following page, absent or null on the last one.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    #[serde(default)]
    pub count: u64,
    /// URL of the next page
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Cursor for the following page, if any
    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| !next.is_empty())
    }
}

/// Upper bound on the number of pages fetched; `0` means unlimited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageBudget(pub u64);

impl PageBudget {
    /// No limit
    pub const UNLIMITED: PageBudget = PageBudget(0);

    /// Whether the budget is spent after `fetched` pages
    pub fn is_exhausted(self, fetched: u64) -> bool {
        self.0 > 0 && fetched >= self.0
    }

    /// Whether a limit is set
    pub fn is_limited(self) -> bool {
        self.0 > 0
    }
}

impl From<u64> for PageBudget {
    fn from(max_pages: u64) -> Self {
        Self(max_pages)
    }
}

/// Result of advancing the paginator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this URL next
    Continue {
        /// URL of the next page
        url: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::Continue { url: url.into() }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
