//! Extension socket: where the browser-side store endpoint connects.
//!
//! The bridge cannot reach the native bookmark store itself — the browser
//! extension connects here and executes store primitives on the bridge's
//! behalf. Outbound commands carry a correlation id; the matching reply
//! resolves a oneshot sender parked in the pending map. In-flight commands
//! have no timeout; they fail only when the socket closes.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::Router;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::WebSocketUpgrade;
use axum::routing::get;
use bridge::store::{self, BookmarkStore, StoreError};
use bridge_protocol::BookmarkMatch;
use bridge_protocol::store_exchange::{StoreCommand, StoreOp, StoreReply};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{info, warn};

struct HubState {
	extension_tx: Option<mpsc::UnboundedSender<Message>>,
	pending: HashMap<u64, oneshot::Sender<store::Result<Value>>>,
	next_command_id: u64,
}

impl HubState {
	fn clear_extension(&mut self) {
		self.extension_tx = None;
		for (_, pending) in self.pending.drain() {
			let _ = pending.send(Err(StoreError::Unavailable(
				"extension connection closed".to_string(),
			)));
		}
	}
}

/// Accepts the browser extension's WebSocket and correlates store commands
/// with their replies.
///
/// One extension at a time: a new connection replaces the old one and fails
/// its in-flight commands.
#[derive(Clone)]
pub struct ExtensionHub {
	state: Arc<Mutex<HubState>>,
	connected_tx: watch::Sender<bool>,
	connected_rx: watch::Receiver<bool>,
}

impl Default for ExtensionHub {
	fn default() -> Self {
		Self::new()
	}
}

impl ExtensionHub {
	pub fn new() -> Self {
		let (connected_tx, connected_rx) = watch::channel(false);
		Self {
			state: Arc::new(Mutex::new(HubState {
				extension_tx: None,
				pending: HashMap::new(),
				next_command_id: 0,
			})),
			connected_tx,
			connected_rx,
		}
	}

	/// Store handle that forwards every primitive through this hub.
	pub fn store(&self) -> ExtensionStore {
		ExtensionStore { hub: self.clone() }
	}

	/// Resolves once an extension is connected.
	pub async fn wait_connected(&self) {
		let mut rx = self.connected_rx.clone();
		while !*rx.borrow() {
			if rx.changed().await.is_err() {
				return;
			}
		}
	}

	pub async fn handle_socket(self, socket: WebSocket) {
		info!(target = "bmb.extension", "extension connected");

		let (tx, rx) = mpsc::unbounded_channel();
		{
			let mut state = self.state.lock().await;
			if state.extension_tx.is_some() {
				warn!(target = "bmb.extension", "replacing existing extension connection");
				state.clear_extension();
			}
			state.extension_tx = Some(tx);
		}
		let _ = self.connected_tx.send(true);

		let mut rx_stream = UnboundedReceiverStream::new(rx);
		let (mut ws_tx, mut ws_rx) = socket.split();

		let send_task = tokio::spawn(async move {
			while let Some(msg) = rx_stream.next().await {
				if ws_tx.send(msg).await.is_err() {
					break;
				}
			}
		});

		while let Some(msg) = ws_rx.next().await {
			match msg {
				Ok(Message::Text(text)) => {
					if let Err(err) = self.handle_reply(&text).await {
						warn!(target = "bmb.extension", error = %err, "failed handling extension reply");
					}
				}
				Ok(Message::Close(_)) => break,
				Ok(_) => {}
				Err(err) => {
					warn!(target = "bmb.extension", error = %err, "extension websocket error");
					break;
				}
			}
		}

		{
			let mut state = self.state.lock().await;
			state.clear_extension();
		}
		let _ = self.connected_tx.send(false);
		send_task.abort();
		info!(target = "bmb.extension", "extension disconnected");
	}

	async fn handle_reply(&self, raw: &str) -> Result<()> {
		let reply: StoreReply = serde_json::from_str(raw).context("Parsing extension reply")?;

		let pending = {
			let mut state = self.state.lock().await;
			state.pending.remove(&reply.id)
		};

		let Some(sender) = pending else {
			warn!(
				target = "bmb.extension",
				id = reply.id,
				"reply with unknown id from extension"
			);
			return Ok(());
		};

		let result = match reply.error {
			Some(fault) => Err(StoreError::Backend(fault.message)),
			None => Ok(reply.result.unwrap_or(Value::Null)),
		};
		let _ = sender.send(result);
		Ok(())
	}

	/// Forward one store primitive and await its reply.
	///
	/// No timeout: the future resolves when the extension answers or its
	/// socket closes, whichever comes first.
	async fn send_command(&self, op: StoreOp) -> store::Result<Value> {
		let (resp_tx, resp_rx) = oneshot::channel();

		let (tx, id) = {
			let mut state = self.state.lock().await;
			let tx = state
				.extension_tx
				.clone()
				.ok_or_else(|| StoreError::Unavailable("extension not connected".to_string()))?;
			state.next_command_id += 1;
			let id = state.next_command_id;
			state.pending.insert(id, resp_tx);
			(tx, id)
		};

		let command = StoreCommand { id, op };
		let payload = serde_json::to_string(&command)
			.map_err(|err| StoreError::Backend(format!("encoding store command: {err}")))?;
		if tx.send(Message::Text(payload.into())).is_err() {
			let mut state = self.state.lock().await;
			state.pending.remove(&id);
			return Err(StoreError::Unavailable(
				"extension connection closed".to_string(),
			));
		}

		match resp_rx.await {
			Ok(result) => result,
			Err(_) => Err(StoreError::Unavailable(
				"extension connection closed".to_string(),
			)),
		}
	}
}

/// [`BookmarkStore`] that forwards every primitive over the extension socket.
#[derive(Clone)]
pub struct ExtensionStore {
	hub: ExtensionHub,
}

#[async_trait]
impl BookmarkStore for ExtensionStore {
	async fn remove_by_id(&self, id: &str) -> store::Result<()> {
		self.hub
			.send_command(StoreOp::RemoveById { id: id.to_string() })
			.await
			.map(|_| ())
	}

	async fn search_by_url(&self, url: &str) -> store::Result<Vec<BookmarkMatch>> {
		let value = self
			.hub
			.send_command(StoreOp::SearchByUrl {
				url: url.to_string(),
			})
			.await?;
		if value.is_null() {
			return Ok(Vec::new());
		}
		serde_json::from_value(value)
			.map_err(|err| StoreError::Backend(format!("malformed search reply: {err}")))
	}
}

/// Bind a bare extension socket and return its hub.
///
/// Used by the purge surface, which drives the store directly and does not
/// host the caller-facing channels.
pub async fn listen(host: &str, port: u16) -> Result<ExtensionHub> {
	let hub = ExtensionHub::new();

	let socket_hub = hub.clone();
	let app = Router::new().route(
		"/extension",
		get(move |ws: WebSocketUpgrade| {
			let hub = socket_hub.clone();
			async move { ws.on_upgrade(move |socket| hub.handle_socket(socket)) }
		}),
	);

	let addr: SocketAddr = format!("{host}:{port}")
		.parse()
		.with_context(|| format!("Invalid host/port combination: {host}:{port}"))?;
	let listener = TcpListener::bind(addr)
		.await
		.with_context(|| format!("Failed to bind extension socket to {addr}"))?;

	info!(target = "bmb.extension", host, port, "extension socket listening");

	tokio::spawn(async move {
		if let Err(err) = axum::serve(listener, app.into_make_service()).await {
			warn!(target = "bmb.extension", error = %err, "extension socket error");
		}
	});

	Ok(hub)
}
