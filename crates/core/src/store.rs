//! Interface to the native bookmark store.

pub mod memory;

use async_trait::async_trait;
use bridge_protocol::BookmarkMatch;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Fault raised by a single store primitive.
///
/// These are per-item errors: a batch records them in the failing item's
/// result entry and keeps going.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The store has no bookmark with this id.
	#[error("bookmark not found: {0}")]
	NotFound(String),

	/// The store endpoint is not reachable, or closed mid-call.
	#[error("store unavailable: {0}")]
	Unavailable(String),

	/// The store executed the call and reported a fault of its own.
	#[error("{0}")]
	Backend(String),
}

/// Sanctioned access to the browser's bookmark subsystem.
///
/// The bridge never mutates bookmark data on its own; every delete and query
/// goes through an implementation of this trait so the browser's account-sync
/// guarantees hold. Calls carry no timeout — a call that never resolves
/// stalls the batch that issued it. Concurrent access is not documented as
/// safe by the store, so batches issue calls strictly one at a time.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
	/// Remove the bookmark with the given id.
	async fn remove_by_id(&self, id: &str) -> Result<()>;

	/// Exact-match search on the URL field.
	///
	/// Zero, one, or many matches are all legitimate outcomes: the same URL
	/// may be bookmarked from several folders or profiles.
	async fn search_by_url(&self, url: &str) -> Result<Vec<BookmarkMatch>>;
}
