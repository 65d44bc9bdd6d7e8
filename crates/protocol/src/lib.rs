//! Wire types for the bookmark bridge protocol.
//!
//! The bridge speaks one envelope format over both caller-facing transports:
//!
//! 1. A caller delivers a [`BridgeRequest`] — either as the body of a one-shot
//!    message or as a text frame on a persistent channel.
//! 2. The router handles the request to completion and answers with exactly
//!    one [`BridgeResponse`] on the same exchange.
//!
//! Field names are camelCase on the wire to stay compatible with the
//! extension-side implementation of the same protocol.
//!
//! # Main Types
//!
//! - [`BridgeRequest`] - Inbound request envelope, tagged by `action`
//! - [`BridgeResponse`] - Outbound response envelope
//! - [`DeleteResult`] / [`LookupResult`] - Per-item batch outcomes
//! - [`BookmarkMatch`] - One bookmark as reported by the native store

pub mod store_exchange;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a bookmark in the native store.
///
/// The store's key space is string-typed, but callers may deliver ids as JSON
/// numbers; those are coerced to their decimal string form at the
/// deserialization boundary, before any store call. The bridge imposes no
/// uniqueness or ordering on ids — duplicates in a batch are processed
/// independently, once each.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookmarkId(String);

impl BookmarkId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl fmt::Display for BookmarkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for BookmarkId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<&str> for BookmarkId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl<'de> Deserialize<'de> for BookmarkId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Text(String),
			Number(serde_json::Number),
		}

		Ok(match Repr::deserialize(deserializer)? {
			Repr::Text(id) => Self(id),
			Repr::Number(id) => Self(id.to_string()),
		})
	}
}

/// Request envelope sent by an external caller.
///
/// The action tag is a closed variant: an unrecognized tag fails
/// deserialization, and the transport answers it with a structural fault
/// instead of dropping the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BridgeRequest {
	/// Liveness probe; acknowledged without touching the store.
	Ping,
	/// Delete each listed bookmark, one store call at a time, in input order.
	#[serde(rename_all = "camelCase")]
	DeleteBookmarks { bookmark_ids: Vec<BookmarkId> },
	/// Exact-match lookup for each URL, in input order.
	FindBookmarksByUrl { urls: Vec<String> },
}

/// Response envelope for every request.
///
/// `success` reflects the batch as a whole: a mixed per-item outcome still
/// reports `success: true`; only a structural fault (malformed envelope,
/// unknown action) flips it to `false` and collapses the per-item results
/// into a single top-level `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
	pub success: bool,

	/// One entry per input item, in input order. Present on batch actions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub results: Option<Vec<OperationResult>>,

	/// Top-level fault message. Present only on structural faults.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,

	/// Acknowledgment text. Present only on `ping`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl BridgeResponse {
	/// Successful acknowledgment for `ping`.
	pub fn pong() -> Self {
		Self {
			success: true,
			results: None,
			error: None,
			message: Some("pong".to_string()),
		}
	}

	/// Successful batch envelope carrying per-item results.
	pub fn with_results(results: Vec<OperationResult>) -> Self {
		Self {
			success: true,
			results: Some(results),
			error: None,
			message: None,
		}
	}

	/// Structural fault: the envelope itself could not be handled.
	pub fn fault(error: impl Into<String>) -> Self {
		Self {
			success: false,
			results: None,
			error: Some(error.into()),
			message: None,
		}
	}
}

/// One per-item batch outcome, delete or lookup shaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationResult {
	Delete(DeleteResult),
	Lookup(LookupResult),
}

/// Outcome of one `deleteBookmarks` item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
	/// String form of the id the store was asked to remove.
	pub id: String,
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl DeleteResult {
	pub fn removed(id: &BookmarkId) -> Self {
		Self {
			id: id.as_str().to_string(),
			success: true,
			error: None,
		}
	}

	pub fn failed(id: &BookmarkId, error: impl Into<String>) -> Self {
		Self {
			id: id.as_str().to_string(),
			success: false,
			error: Some(error.into()),
		}
	}
}

/// Outcome of one `findBookmarksByUrl` item.
///
/// `bookmarks` is empty both for a URL with no matches and for a failed
/// query; the two are told apart by `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
	pub url: String,
	pub bookmarks: Vec<BookmarkMatch>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl LookupResult {
	pub fn found(url: impl Into<String>, bookmarks: Vec<BookmarkMatch>) -> Self {
		Self {
			url: url.into(),
			bookmarks,
			error: None,
		}
	}

	pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			bookmarks: Vec::new(),
			error: Some(error.into()),
		}
	}
}

/// One bookmark as reported by the native store.
///
/// The same URL may be bookmarked several times from different folders, so a
/// single lookup can legitimately yield many matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkMatch {
	pub id: String,
	pub title: String,
	pub url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
}
