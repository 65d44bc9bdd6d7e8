use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::styles::cli_styles;

/// Root CLI for the bookmark bridge.
#[derive(Parser, Debug)]
#[command(name = "bmb")]
#[command(about = "Bookmark bridge - sync-safe bookmark mutation through the browser's own store")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the bridge server: one-shot and persistent caller channels plus
	/// the extension store socket.
	Serve(ServeArgs),
	/// Delete bookmarks by hand: ingest an id list, confirm, watch progress.
	Purge(PurgeArgs),
	/// Send a single request over the one-shot channel of a running bridge.
	Send(SendArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
	/// Host to bind.
	#[arg(long, default_value = "127.0.0.1")]
	pub host: String,

	/// Port to bind.
	#[arg(long, default_value_t = 19980)]
	pub port: u16,

	/// Serve against an in-process store instead of a connected extension.
	#[arg(long)]
	pub memory: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PurgeArgs {
	/// File holding identifiers: a JSON array (scalars or `id`-keyed
	/// records) or free text, one id per line, `#` starting a comment.
	#[arg(value_name = "FILE")]
	pub file: Option<PathBuf>,

	/// Read the identifier list from the system clipboard.
	#[arg(long, conflicts_with = "file")]
	pub paste: bool,

	/// Confirm the deletion up front instead of prompting.
	#[arg(long)]
	pub yes: bool,

	/// Host to bind the extension socket on.
	#[arg(long, default_value = "127.0.0.1")]
	pub host: String,

	/// Port to bind the extension socket on.
	#[arg(long, default_value_t = 19981)]
	pub port: u16,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
	/// Base URL of a running bridge server.
	#[arg(long, value_name = "URL", default_value = "http://127.0.0.1:19980")]
	pub endpoint: String,

	#[command(subcommand)]
	pub action: SendAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SendAction {
	/// Liveness probe.
	Ping,
	/// Delete the given bookmark ids, in order.
	Delete {
		/// Bookmark ids, as reported by the native store.
		#[arg(value_name = "ID", required = true)]
		ids: Vec<String>,
	},
	/// Exact-match lookup for the given URLs, in order.
	Find {
		#[arg(value_name = "URL", required = true)]
		urls: Vec<String>,
	},
}
