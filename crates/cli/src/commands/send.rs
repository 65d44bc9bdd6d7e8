//! Caller-side convenience for the one-shot channel.

use anyhow::{Context, Result, anyhow};
use bridge_protocol::{BookmarkId, BridgeRequest, BridgeResponse};

use crate::cli::{SendAction, SendArgs};

pub async fn run(args: SendArgs) -> Result<()> {
	let request = match args.action {
		SendAction::Ping => BridgeRequest::Ping,
		SendAction::Delete { ids } => BridgeRequest::DeleteBookmarks {
			bookmark_ids: ids.into_iter().map(BookmarkId::from).collect(),
		},
		SendAction::Find { urls } => BridgeRequest::FindBookmarksByUrl { urls },
	};

	let url = format!("{}/message", args.endpoint.trim_end_matches('/'));
	let response: BridgeResponse = reqwest::Client::new()
		.post(&url)
		.json(&request)
		.send()
		.await
		.with_context(|| format!("Failed to reach bridge at {url}"))?
		.json()
		.await
		.context("Malformed bridge response")?;

	println!("{}", serde_json::to_string_pretty(&response)?);

	if !response.success {
		let message = response
			.error
			.unwrap_or_else(|| "bridge reported failure".to_string());
		return Err(anyhow!(message));
	}
	Ok(())
}
