//! Action dispatch for inbound request envelopes.

use bridge_protocol::{BridgeRequest, BridgeResponse, OperationResult};

use crate::store::BookmarkStore;
use crate::{batch, lookup};

/// Handle one request envelope to completion and produce its response.
///
/// The transport (one-shot message or persistent channel) awaits the
/// returned future before closing out the exchange, so every request gets
/// exactly one response. The action variant is matched exhaustively; an
/// unrecognized tag never reaches this function — it fails envelope
/// deserialization and the transport answers with a structural fault.
pub async fn handle(store: &dyn BookmarkStore, request: BridgeRequest) -> BridgeResponse {
	match request {
		BridgeRequest::Ping => BridgeResponse::pong(),
		BridgeRequest::DeleteBookmarks { bookmark_ids } => {
			let results = batch::delete_bookmarks(store, &bookmark_ids).await;
			BridgeResponse::with_results(results.into_iter().map(OperationResult::Delete).collect())
		}
		BridgeRequest::FindBookmarksByUrl { urls } => {
			let results = lookup::find_bookmarks_by_url(store, &urls).await;
			BridgeResponse::with_results(results.into_iter().map(OperationResult::Lookup).collect())
		}
	}
}
