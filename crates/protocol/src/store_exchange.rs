//! Protocol types for the extension store socket.
//!
//! The bridge cannot reach the native bookmark store on its own; the browser
//! extension connects to the bridge's extension socket and executes store
//! primitives on its behalf. The exchange is id-correlated:
//!
//! 1. The bridge sends a [`StoreCommand`] with a fresh `id`
//! 2. The extension performs the primitive against the native store
//! 3. The extension answers with a [`StoreReply`] echoing the same `id`,
//!    carrying either `result` or `error`
//!
//! Replies may arrive in any order; the bridge matches them to in-flight
//! commands by id. There is no per-command timeout — a command whose reply
//! never arrives stalls its batch until the socket closes.

use serde::{Deserialize, Serialize};

/// Command sent from the bridge to the extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCommand {
	/// Correlation id, unique per socket lifetime.
	pub id: u64,
	#[serde(flatten)]
	pub op: StoreOp,
}

/// The store primitive to execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum StoreOp {
	/// Remove the bookmark with this id. Success carries no payload.
	#[serde(rename_all = "camelCase")]
	RemoveById { id: String },
	/// Exact-match search on the URL field. Success carries the match list.
	#[serde(rename_all = "camelCase")]
	SearchByUrl { url: String },
}

/// Reply sent from the extension back to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreReply {
	/// Correlation id of the command this answers.
	pub id: u64,
	/// Primitive result on success: `null` for `removeById`, the match list
	/// for `searchByUrl`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<serde_json::Value>,
	/// Store fault on failure.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<StoreFault>,
}

/// A fault reported by the extension for a single command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFault {
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn command_wire_shape() {
		let command = StoreCommand {
			id: 3,
			op: StoreOp::RemoveById { id: "42".into() },
		};
		let json = serde_json::to_string(&command).unwrap();
		assert_eq!(json, r#"{"id":3,"method":"removeById","params":{"id":"42"}}"#);
	}

	#[test]
	fn reply_parses_result_or_error() {
		let reply: StoreReply = serde_json::from_str(r#"{"id":3,"result":null}"#).unwrap();
		assert!(reply.error.is_none());

		let reply: StoreReply =
			serde_json::from_str(r#"{"id":4,"error":{"message":"no such bookmark"}}"#).unwrap();
		assert_eq!(reply.error.unwrap().message, "no such bookmark");
	}
}
