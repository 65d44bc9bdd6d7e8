//! Batched bookmark deletion with per-item failure isolation.

use bridge_protocol::{BookmarkId, DeleteResult};
use tracing::debug;

use crate::store::BookmarkStore;

/// Delete each id in strict input order, one store call at a time.
///
/// A failing id is recorded in its own result entry and never aborts or
/// skips the remaining items, so the output always has one entry per input,
/// in input order. There is no rollback: a mixed success/failure outcome is
/// the expected terminal state of a batch, not an error.
///
/// Items are awaited sequentially — the next store call is not issued until
/// the previous one has resolved. The store's single-writer access pattern
/// is not documented as safe to violate.
pub async fn delete_bookmarks(store: &dyn BookmarkStore, ids: &[BookmarkId]) -> Vec<DeleteResult> {
	let mut results = Vec::with_capacity(ids.len());

	for id in ids {
		match store.remove_by_id(id.as_str()).await {
			Ok(()) => results.push(DeleteResult::removed(id)),
			Err(err) => {
				debug!(target = "bridge", id = %id, error = %err, "delete failed");
				results.push(DeleteResult::failed(id, err.to_string()));
			}
		}
	}

	results
}
