//! Batched URL lookup with per-item failure isolation.

use bridge_protocol::LookupResult;
use tracing::debug;

use crate::store::BookmarkStore;

/// Resolve each URL in strict input order, one store query at a time.
///
/// Each URL gets an exact-match query against the store's URL field; zero,
/// one, or many matches are all legitimate. A failed query is recorded in
/// that URL's result entry (with an empty match list) and never aborts the
/// remaining items. No deduplication or merging happens across URLs.
pub async fn find_bookmarks_by_url(store: &dyn BookmarkStore, urls: &[String]) -> Vec<LookupResult> {
	let mut results = Vec::with_capacity(urls.len());

	for url in urls {
		match store.search_by_url(url).await {
			Ok(bookmarks) => results.push(LookupResult::found(url.as_str(), bookmarks)),
			Err(err) => {
				debug!(target = "bridge", url = %url, error = %err, "lookup failed");
				results.push(LookupResult::failed(url.as_str(), err.to_string()));
			}
		}
	}

	results
}
