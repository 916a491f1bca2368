//! Page streams over [`HubClient`]

use super::paginator::Paginator;
use super::types::Page;
use crate::client::HubClient;
use crate::error::{Error, Result};
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use std::pin::Pin;

/// Boxed stream of pages
pub type PageStream<T> = Pin<Box<dyn Stream<Item = Result<Page<T>>> + Send>>;

impl HubClient {
    /// Stream the pages of a list endpoint, honouring the page budget
    ///
    /// The stream ends when a page has no `next`, when the budget is spent,
    /// or right after yielding the first error.
    pub fn pages<T>(&self, url: &str) -> PageStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let state = (self.clone(), Paginator::new(url, self.max_page_results()));
        Box::pin(stream::try_unfold(state, |(client, mut paginator)| async move {
            let Some(url) = paginator.next_url().map(str::to_string) else {
                return Ok(None);
            };
            let page: Page<T> = client.get(&url).await?;
            paginator.advance(page.next.as_deref());
            Ok::<_, Error>(Some((page, (client, paginator))))
        }))
    }

    /// Fetch every page (up to the budget) and concatenate the results
    pub async fn paginate<T>(&self, url: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let mut pages = self.pages::<T>(url);
        let mut items = Vec::new();
        while let Some(page) = pages.try_next().await? {
            items.extend(page.results);
        }
        Ok(items)
    }
}
