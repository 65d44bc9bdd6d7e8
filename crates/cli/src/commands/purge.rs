//! Operator-facing purge command.
//!
//! Front end for the core purge session: ingests the identifier list from a
//! file, the clipboard, or stdin, binds an extension socket so the store is
//! reachable, and renders the run live. The delete loop itself (ordering,
//! failure isolation, progress, post-run input policy) lives in the core
//! crate; the purge path bypasses the router and drives the store directly.

use std::io::{self, BufRead, IsTerminal, Read, Write};

use anyhow::{Context, Result, bail};
use bridge::manual::{PurgeSession, RunOutcome, RunUpdate};
use colored::Colorize;

use crate::cli::PurgeArgs;
use crate::extension;

pub async fn run(args: PurgeArgs) -> Result<()> {
	let mut session = PurgeSession::new();
	let used_stdin = ingest(&args, &mut session)?;

	// The prompt reads stdin too; if the id list already consumed a piped
	// stdin there is nothing left to answer with.
	if !args.yes && used_stdin && !io::stdin().is_terminal() {
		bail!("stdin already carried the identifier list; pass --yes or load from a file");
	}

	let hub = extension::listen(&args.host, args.port).await?;
	println!(
		"Waiting for the extension to connect on ws://{}:{}/extension ...",
		args.host, args.port
	);
	hub.wait_connected().await;
	let store = hub.store();

	let confirm = |count: usize| {
		if args.yes {
			return true;
		}
		confirm_prompt(count)
	};

	let outcome = session.run_delete(&store, confirm, render_update).await;

	match outcome {
		RunOutcome::Empty => println!("No identifiers to delete."),
		RunOutcome::Declined => println!("Aborted; nothing was deleted."),
		RunOutcome::Finished(summary) => {
			if summary.failed == 0 {
				println!(
					"{} {} bookmark(s) deleted; input cleared.",
					"done:".green().bold(),
					summary.succeeded
				);
			} else {
				println!(
					"{} {} deleted, {} failed; the input is kept so succeeded entries can be pruned and the rest resubmitted.",
					"done:".yellow().bold(),
					summary.succeeded,
					summary.failed
				);
			}
		}
	}

	Ok(())
}

/// Fill the session input. Returns whether stdin was consumed.
fn ingest(args: &PurgeArgs, session: &mut PurgeSession) -> Result<bool> {
	if let Some(path) = &args.file {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read {}", path.display()))?;
		session.load_file(&content);
		return Ok(false);
	}

	if args.paste {
		let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
		let text = clipboard.get_text().context("Clipboard read failed")?;
		session.paste(&text);
		return Ok(false);
	}

	if io::stdin().is_terminal() {
		eprintln!("Enter one bookmark id per line ('#' starts a comment); finish with Ctrl-D.");
	}
	let mut text = String::new();
	io::stdin()
		.read_to_string(&mut text)
		.context("Failed reading identifiers from stdin")?;
	session.set_input(&text);
	Ok(true)
}

fn confirm_prompt(count: usize) -> bool {
	print!(
		"{} delete {count} bookmark(s)? This cannot be undone and propagates to the account's sync layer. [y/N] ",
		"warning:".yellow().bold()
	);
	let _ = io::stdout().flush();

	let mut line = String::new();
	if io::stdin().lock().read_line(&mut line).is_err() {
		return false;
	}
	matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn render_update(update: RunUpdate<'_>) {
	let entry = update.entry;
	if entry.success {
		println!(
			"[{:>3}%] {} {}",
			update.progress,
			"deleted".green(),
			entry.label
		);
	} else {
		let error = entry.error.as_deref().unwrap_or("unknown fault");
		println!(
			"[{:>3}%] {}  {}: {}",
			update.progress,
			"failed".red(),
			entry.label,
			error
		);
	}
}
