use std::net::SocketAddr;
use std::sync::Arc;

use bridge::store::BookmarkStore;
use bridge_cli::extension::ExtensionHub;
use bridge_cli::server;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

async fn spawn_app_with_hub() -> (SocketAddr, ExtensionHub) {
	let hub = ExtensionHub::new();
	let store: Arc<dyn BookmarkStore> = Arc::new(hub.store());
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let app = server::app(store, Some(hub.clone()));
	tokio::spawn(async move {
		axum::serve(listener, app.into_make_service()).await.unwrap();
	});
	(addr, hub)
}

async fn post_message(addr: SocketAddr, body: Value) -> Value {
	reqwest::Client::new()
		.post(format!("http://{addr}/message"))
		.json(&body)
		.send()
		.await
		.unwrap()
		.json()
		.await
		.unwrap()
}

/// Scripted stand-in for the browser extension: answers `removeById` with
/// success for ids it knows and a fault otherwise, and `searchByUrl` with a
/// single match echoing the queried URL.
async fn run_fake_extension(addr: SocketAddr) {
	let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/extension"))
		.await
		.expect("extension socket should upgrade");

	tokio::spawn(async move {
		while let Some(Ok(msg)) = ws.next().await {
			let Message::Text(text) = msg else { continue };
			let command: Value = serde_json::from_str(&text).unwrap();
			let id = command["id"].as_u64().unwrap();

			let reply = match command["method"].as_str().unwrap() {
				"removeById" => {
					if command["params"]["id"] == "good" {
						json!({"id": id, "result": null})
					} else {
						json!({"id": id, "error": {"message": "bookmark not found"}})
					}
				}
				"searchByUrl" => json!({
					"id": id,
					"result": [{
						"id": "1",
						"title": "Example",
						"url": command["params"]["url"],
						"parentId": "0",
					}],
				}),
				other => panic!("unexpected store method: {other}"),
			};

			if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
				break;
			}
		}
	});
}

#[tokio::test]
async fn store_calls_are_forwarded_and_correlated() {
	let (addr, hub) = spawn_app_with_hub().await;
	run_fake_extension(addr).await;
	hub.wait_connected().await;

	let response = post_message(
		addr,
		json!({"action": "deleteBookmarks", "bookmarkIds": ["good", "bad", "good"]}),
	)
	.await;

	assert_eq!(response["success"], true);
	let results = response["results"].as_array().unwrap();
	assert_eq!(results.len(), 3);
	assert_eq!(results[0]["success"], true);
	assert_eq!(results[1]["success"], false);
	assert!(results[1]["error"].as_str().unwrap().contains("not found"));
	assert_eq!(results[2]["success"], true);

	let response = post_message(
		addr,
		json!({"action": "findBookmarksByUrl", "urls": ["https://example.com"]}),
	)
	.await;
	let bookmarks = response["results"][0]["bookmarks"].as_array().unwrap();
	assert_eq!(bookmarks.len(), 1);
	assert_eq!(bookmarks[0]["url"], "https://example.com");
}

#[tokio::test]
async fn calls_without_an_extension_fail_per_item() {
	let (addr, _hub) = spawn_app_with_hub().await;

	let response = post_message(
		addr,
		json!({"action": "deleteBookmarks", "bookmarkIds": ["a", "b"]}),
	)
	.await;

	// store faults stay per-item; the envelope itself is healthy
	assert_eq!(response["success"], true);
	let results = response["results"].as_array().unwrap();
	assert_eq!(results.len(), 2);
	for result in results {
		assert_eq!(result["success"], false);
		assert!(result["error"].as_str().unwrap().contains("not connected"));
	}
}

#[tokio::test]
async fn closing_the_extension_fails_in_flight_calls() {
	let (addr, hub) = spawn_app_with_hub().await;

	// extension that reads the first command and hangs up without replying
	let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/extension"))
		.await
		.unwrap();
	tokio::spawn(async move {
		while let Some(Ok(msg)) = ws.next().await {
			if matches!(msg, Message::Text(_)) {
				let _ = ws.close(None).await;
				break;
			}
		}
	});
	hub.wait_connected().await;

	let response = post_message(
		addr,
		json!({"action": "deleteBookmarks", "bookmarkIds": ["a"]}),
	)
	.await;

	let results = response["results"].as_array().unwrap();
	assert_eq!(results[0]["success"], false);
	assert!(results[0]["error"].as_str().unwrap().contains("closed"));
}
