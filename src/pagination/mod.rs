//! Pagination module
//!
//! Walks cursor-based list endpoints: each page carries an absolute `next`
//! URL, and traversal stops when it is absent or the page budget is spent.
//! Hitting the budget is not an error; the pages fetched so far are valid.

mod paginator;
mod stream;
mod types;

pub use paginator::Paginator;
pub use stream::PageStream;
pub use types::{NextPage, Page, PageBudget};
