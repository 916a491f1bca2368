//! Cursor-following state machine

use super::types::{NextPage, PageBudget};
use tracing::debug;

/// Tracks the cursor and page count during a traversal
///
/// The paginator never fetches anything itself; the caller asks for
/// [`next_url`](Paginator::next_url), fetches it and reports the page's
/// `next` back through [`advance`](Paginator::advance).
#[derive(Debug, Clone)]
pub struct Paginator {
    cursor: Option<String>,
    budget: PageBudget,
    pages_fetched: u64,
    stopped_by_budget: bool,
}

impl Paginator {
    /// Start a traversal at `initial_url`
    pub fn new(initial_url: impl Into<String>, budget: impl Into<PageBudget>) -> Self {
        let initial_url = initial_url.into();
        Self {
            cursor: (!initial_url.is_empty()).then_some(initial_url),
            budget: budget.into(),
            pages_fetched: 0,
            stopped_by_budget: false,
        }
    }

    /// URL to fetch next, `None` once the traversal is over
    pub fn next_url(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Record a fetched page whose `next` field was `next`
    pub fn advance(&mut self, next: Option<&str>) -> NextPage {
        self.pages_fetched += 1;

        if self.budget.is_exhausted(self.pages_fetched) {
            if next.is_some_and(|n| !n.is_empty()) {
                debug!(
                    pages = self.pages_fetched,
                    budget = self.budget.0,
                    "Page budget reached, stopping early"
                );
                self.stopped_by_budget = true;
            }
            self.cursor = None;
            return NextPage::Done;
        }

        match next.filter(|n| !n.is_empty()) {
            Some(next) => {
                self.cursor = Some(next.to_string());
                NextPage::with_url(next)
            }
            None => {
                self.cursor = None;
                NextPage::Done
            }
        }
    }

    /// Pages reported so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// Whether the traversal ended because the budget ran out while more
    /// pages were available
    pub fn stopped_by_budget(&self) -> bool {
        self.stopped_by_budget
    }

    /// Whether the traversal is over
    pub fn is_done(&self) -> bool {
        self.cursor.is_none()
    }
}
