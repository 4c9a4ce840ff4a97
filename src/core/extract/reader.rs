//! Source reader
//!
//! Walks the paginated listing from page 1 and fetches detail for every
//! listed id. Detail fetches within a page run concurrently but items are
//! yielded in listing order.

use crate::adapters::animals::{AnimalApiClient, AnimalPage};
use crate::domain::{AnimalId, FaunaError, PipelineError, RawRecord, Result};
use futures::future;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::sync::Arc;

/// One item produced by the listing walk
#[derive(Debug, Clone, PartialEq)]
pub enum SourceItem {
    /// A listing page was fetched; its records follow
    Page { page: u32, count: usize },
    /// A detail record was fetched
    Record(RawRecord),
    /// Detail for an id could not be fetched or decoded
    Skipped { id: AnimalId, reason: String },
}

/// Lazy reader over the animal service
pub struct SourceReader {
    client: Arc<AnimalApiClient>,
    detail_concurrency: usize,
}

impl SourceReader {
    pub fn new(client: Arc<AnimalApiClient>, detail_concurrency: usize) -> Self {
        Self {
            client,
            detail_concurrency: detail_concurrency.max(1),
        }
    }

    /// Stream every item of the service, starting again from page 1
    ///
    /// The stream ends after the last page, or right after yielding a
    /// [`PipelineError::ListingFailed`] if a listing page cannot be fetched.
    pub fn stream(&self) -> BoxStream<'static, Result<SourceItem>> {
        let pages_client = Arc::clone(&self.client);
        let detail_client = Arc::clone(&self.client);
        let concurrency = self.detail_concurrency;

        stream::unfold(Some(1u32), move |next| {
            let client = Arc::clone(&pages_client);
            async move {
                let Some(page) = next else {
                    return None;
                };
                match client.list_animals(page).await {
                    Ok(listing) => {
                        let following = if listing.has_more(page) {
                            page.checked_add(1)
                        } else {
                            None
                        };
                        Some((Ok((page, listing)), following))
                    }
                    Err(source) => {
                        let err = PipelineError::ListingFailed {
                            page,
                            url: client.listing_url(page),
                            source,
                        };
                        Some((Err(FaunaError::from(err)), None))
                    }
                }
            }
        })
        .flat_map(move |result| match result {
            Ok((page, listing)) => {
                page_items(Arc::clone(&detail_client), page, listing, concurrency).left_stream()
            }
            Err(err) => stream::once(future::ready(Err(err))).right_stream(),
        })
        .boxed()
    }
}

fn page_items(
    client: Arc<AnimalApiClient>,
    page: u32,
    listing: AnimalPage,
    concurrency: usize,
) -> impl Stream<Item = Result<SourceItem>> + Send {
    let ids = listing.ids();
    tracing::info!(
        page = page,
        total_pages = ?listing.total_pages,
        count = ids.len(),
        "Fetched listing page"
    );

    let header = stream::once(future::ready(Ok::<_, FaunaError>(SourceItem::Page {
        page,
        count: ids.len(),
    })));

    let details = stream::iter(ids)
        .map(move |id| {
            let client = Arc::clone(&client);
            async move { Ok::<_, FaunaError>(fetch_detail(&client, id).await) }
        })
        .buffered(concurrency);

    header.chain(details)
}

async fn fetch_detail(client: &AnimalApiClient, id: AnimalId) -> SourceItem {
    match client.get_animal(id).await {
        Ok(record) => {
            tracing::debug!(animal_id = %id, "Fetched animal detail");
            SourceItem::Record(record)
        }
        Err(e) => {
            tracing::warn!(
                animal_id = %id,
                error = %e,
                "Skipping animal, detail could not be fetched"
            );
            SourceItem::Skipped {
                id,
                reason: e.to_string(),
            }
        }
    }
}
