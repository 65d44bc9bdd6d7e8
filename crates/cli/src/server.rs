//! Bridge server: the caller-facing transports.
//!
//! Three endpoints:
//!
//! - `POST /message` — one-shot channel. One envelope per request; the
//!   handler's future is awaited by the transport before the exchange is
//!   closed out, so the asynchronous store work always completes before the
//!   single response is delivered.
//! - `GET /channel` — persistent channel. A WebSocket carrying any number of
//!   independent request/response exchanges, each handled to completion
//!   before the next frame is read.
//! - `GET /extension` — store socket (absent in memory mode); see
//!   [`crate::extension`].
//!
//! A one-shot request can race a persistent-channel batch mid-flight: the
//! two reach the store with no coordination, no lock or queue spans the
//! transports. Callers that need ordering must serialize on their side.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bridge::store::BookmarkStore;
use bridge::{MemoryStore, router};
use bridge_protocol::{BridgeRequest, BridgeResponse};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Shared state of the bridge server.
#[derive(Clone)]
pub struct AppState {
	store: Arc<dyn BookmarkStore>,
	hub: Option<crate::extension::ExtensionHub>,
}

/// Build the bridge application around a store.
///
/// `hub` wires the `/extension` socket; pass `None` in memory mode.
pub fn app(store: Arc<dyn BookmarkStore>, hub: Option<crate::extension::ExtensionHub>) -> Router {
	let state = AppState { store, hub };

	Router::new()
		.route("/", get(|| async { "OK" }))
		.route("/message", post(handle_message))
		.route(
			"/channel",
			get(|ws: WebSocketUpgrade, State(state): State<AppState>| async move {
				ws.on_upgrade(|socket| handle_channel(socket, state))
			}),
		)
		.route(
			"/extension",
			get(|ws: WebSocketUpgrade, State(state): State<AppState>| async move {
				match state.hub {
					Some(hub) => ws
						.on_upgrade(move |socket| hub.handle_socket(socket))
						.into_response(),
					None => (StatusCode::NOT_FOUND, "no extension socket in memory mode")
						.into_response(),
				}
			}),
		)
		.with_state(state)
}

/// Run the bridge server until the process is stopped.
pub async fn run(host: &str, port: u16, memory: bool) -> Result<()> {
	let hub = (!memory).then(crate::extension::ExtensionHub::new);
	let store: Arc<dyn BookmarkStore> = match &hub {
		Some(hub) => Arc::new(hub.store()),
		None => Arc::new(MemoryStore::new()),
	};

	let app = app(store, hub);

	let addr: SocketAddr = format!("{host}:{port}")
		.parse()
		.with_context(|| format!("Invalid host/port combination: {host}:{port}"))?;
	let listener = TcpListener::bind(addr)
		.await
		.with_context(|| format!("Failed to bind bridge server to {addr}"))?;

	// One-time startup notification; no lifecycle beyond process start.
	info!(target = "bmb.server", host, port, memory, "bridge loaded");

	axum::serve(listener, app.into_make_service())
		.await
		.context("Bridge server error")
}

/// One-shot channel: one envelope in, one envelope out.
async fn handle_message(State(state): State<AppState>, body: String) -> Json<BridgeResponse> {
	Json(dispatch_text(&state, &body).await)
}

/// Parse and handle one envelope.
///
/// A malformed or unrecognized envelope is answered with a structural fault
/// rather than dropped, so callers never need a timeout to notice a typo in
/// the action tag.
async fn dispatch_text(state: &AppState, raw: &str) -> BridgeResponse {
	match serde_json::from_str::<BridgeRequest>(raw) {
		Ok(request) => router::handle(state.store.as_ref(), request).await,
		Err(err) => {
			warn!(target = "bmb.server", error = %err, "structural fault in request envelope");
			BridgeResponse::fault(format!("invalid request: {err}"))
		}
	}
}

/// Persistent channel: sequential request/response exchanges over one
/// connection.
async fn handle_channel(socket: WebSocket, state: AppState) {
	info!(target = "bmb.server", "caller channel connected");
	let (mut ws_tx, mut ws_rx) = socket.split();

	while let Some(msg) = ws_rx.next().await {
		match msg {
			Ok(Message::Text(text)) => {
				let response = dispatch_text(&state, &text).await;
				let payload = match serde_json::to_string(&response) {
					Ok(payload) => payload,
					Err(err) => {
						warn!(target = "bmb.server", error = %err, "failed encoding response");
						break;
					}
				};
				if ws_tx.send(Message::Text(payload.into())).await.is_err() {
					break;
				}
			}
			Ok(Message::Close(_)) => break,
			Ok(_) => {}
			Err(err) => {
				warn!(target = "bmb.server", error = %err, "caller channel error");
				break;
			}
		}
	}

	info!(target = "bmb.server", "caller channel disconnected");
}
