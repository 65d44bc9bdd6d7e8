//! In-process reference store.
//!
//! Backs `--memory` server runs and the test suite. Semantics mirror the
//! native store's primitives: removal is by exact id, search is an exact
//! match on the URL field, and both can fault per item.

use async_trait::async_trait;
use bridge_protocol::BookmarkMatch;
use parking_lot::Mutex;

use super::{BookmarkStore, Result, StoreError};

/// Bookmark store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
	records: Mutex<Vec<BookmarkMatch>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store seeded with the given records, in order.
	pub fn with_records(records: impl IntoIterator<Item = BookmarkMatch>) -> Self {
		Self {
			records: Mutex::new(records.into_iter().collect()),
		}
	}

	pub fn insert(&self, record: BookmarkMatch) {
		self.records.lock().push(record);
	}

	pub fn len(&self) -> usize {
		self.records.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.lock().is_empty()
	}
}

#[async_trait]
impl BookmarkStore for MemoryStore {
	async fn remove_by_id(&self, id: &str) -> Result<()> {
		let mut records = self.records.lock();
		match records.iter().position(|record| record.id == id) {
			Some(index) => {
				records.remove(index);
				Ok(())
			}
			None => Err(StoreError::NotFound(id.to_string())),
		}
	}

	async fn search_by_url(&self, url: &str) -> Result<Vec<BookmarkMatch>> {
		let records = self.records.lock();
		Ok(records
			.iter()
			.filter(|record| record.url == url)
			.cloned()
			.collect())
	}
}
