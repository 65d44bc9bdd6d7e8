//! Bookmark bridge core.
//!
//! An external application cannot mutate a browser's bookmark store without
//! breaking its account-sync guarantees; only the browser's own extension API
//! can delete or query bookmarks sync-safely. This crate is the bridge's
//! logic layer: the store interface, the ordered batch semantics with
//! per-item failure isolation, the action dispatch, and the operator-driven
//! purge session. Transports live in `bridge-cli`.
//!
//! Everything here is stateless and call-scoped — the bridge caches and
//! persists nothing across invocations.

pub mod batch;
pub mod lookup;
pub mod manual;
pub mod router;
pub mod store;

pub use store::memory::MemoryStore;
pub use store::{BookmarkStore, StoreError};
