//! Operator-driven purge session.
//!
//! The manual path performs the same batched delete as the router but is
//! driven by a human instead of an external caller, and talks to the store
//! directly. Identifiers arrive as typed text, a clipboard paste, or a file;
//! a confirmation gate precedes any mutation; per-item outcomes and a
//! percentage indicator are reported live; and a partially failed run leaves
//! the input in place so the operator can prune succeeded entries and
//! resubmit by hand — that manual resubmission is the only retry path.

use tracing::debug;

use crate::store::BookmarkStore;

/// Enabled/disabled state of the purge surface's interactive controls.
///
/// Every control is disabled for the duration of a run and re-enabled
/// unconditionally when the run ends, whatever its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
	pub load: bool,
	pub paste: bool,
	pub clear: bool,
	pub delete: bool,
	pub input: bool,
}

impl Controls {
	fn all(enabled: bool) -> Self {
		Self {
			load: enabled,
			paste: enabled,
			clear: enabled,
			delete: enabled,
			input: enabled,
		}
	}

	pub fn all_enabled(&self) -> bool {
		self.load && self.paste && self.clear && self.delete && self.input
	}

	pub fn all_disabled(&self) -> bool {
		!(self.load || self.paste || self.clear || self.delete || self.input)
	}
}

/// One identifier resolved from the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
	/// The line as the operator provided it, before normalization. This is
	/// what result-log lines carry.
	pub raw: String,
	/// Trimmed form used for the store call.
	pub id: String,
}

/// One line of the append-only result log.
#[derive(Debug, Clone)]
pub struct LogEntry {
	/// Original, pre-normalization identifier.
	pub label: String,
	pub success: bool,
	pub error: Option<String>,
}

/// Snapshot handed to the run observer after each completed item.
#[derive(Debug)]
pub struct RunUpdate<'a> {
	pub controls: Controls,
	/// `round(completed / total * 100)`; exactly 100 once the last item is done.
	pub progress: u8,
	pub entry: &'a LogEntry,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
	/// The input resolved to zero identifiers; the loop was never entered.
	Empty,
	/// The operator declined the confirmation prompt; zero store calls.
	Declined,
	/// The delete loop ran to completion.
	Finished(RunSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
	pub total: usize,
	pub succeeded: usize,
	pub failed: usize,
}

/// Interpret file content for import.
///
/// The content is first tried as a JSON array: scalar elements become
/// identifiers (numbers in decimal string form) and object elements
/// contribute the value of their `id` field, rejoined one per line. If the
/// parse fails the raw text is used unmodified — the fault is swallowed, not
/// surfaced, since free text is a legitimate import shape of its own.
pub fn import_text(content: &str) -> String {
	match structured_lines(content) {
		Some(lines) => lines.join("\n"),
		None => content.to_string(),
	}
}

fn structured_lines(content: &str) -> Option<Vec<String>> {
	let values: Vec<serde_json::Value> = serde_json::from_str(content).ok()?;
	let mut lines = Vec::new();
	for value in values {
		match value {
			serde_json::Value::String(id) => lines.push(id),
			serde_json::Value::Number(id) => lines.push(id.to_string()),
			serde_json::Value::Object(record) => match record.get("id") {
				Some(serde_json::Value::String(id)) => lines.push(id.clone()),
				Some(serde_json::Value::Number(id)) => lines.push(id.to_string()),
				_ => {}
			},
			_ => {}
		}
	}
	Some(lines)
}

/// Normalize the input into pending items: split on newlines, trim each
/// line, drop blanks and lines whose first non-whitespace character is `#`.
pub fn resolve_items(input: &str) -> Vec<PendingItem> {
	input
		.lines()
		.filter_map(|line| {
			let id = line.trim();
			if id.is_empty() || id.starts_with('#') {
				return None;
			}
			Some(PendingItem {
				raw: line.to_string(),
				id: id.to_string(),
			})
		})
		.collect()
}

/// Percentage of a run completed, rounded to the nearest whole point.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
	if total == 0 {
		return 0;
	}
	((completed as f64 / total as f64) * 100.0).round() as u8
}

/// State of one purge surface: the input field, the control set, the
/// progress indicator, and the append-only result log.
///
/// Call-scoped like everything else in the bridge — nothing here persists
/// across sessions.
#[derive(Debug)]
pub struct PurgeSession {
	input: String,
	controls: Controls,
	progress: u8,
	log: Vec<LogEntry>,
}

impl Default for PurgeSession {
	fn default() -> Self {
		Self::new()
	}
}

impl PurgeSession {
	pub fn new() -> Self {
		Self {
			input: String::new(),
			controls: Controls::all(true),
			progress: 0,
			log: Vec::new(),
		}
	}

	/// Replace the input with typed text.
	pub fn set_input(&mut self, text: impl Into<String>) {
		self.input = text.into();
	}

	/// Replace the input with clipboard content.
	pub fn paste(&mut self, clipboard_text: &str) {
		self.input = clipboard_text.to_string();
	}

	/// Replace the input with imported file content (see [`import_text`]).
	pub fn load_file(&mut self, content: &str) {
		self.input = import_text(content);
	}

	pub fn clear(&mut self) {
		self.input.clear();
	}

	pub fn input(&self) -> &str {
		&self.input
	}

	pub fn controls(&self) -> Controls {
		self.controls
	}

	pub fn progress(&self) -> u8 {
		self.progress
	}

	pub fn log(&self) -> &[LogEntry] {
		&self.log
	}

	/// Run the delete loop over the current input.
	///
	/// `confirm` is invoked with the resolved item count before any store
	/// call; returning `false` aborts the run entirely. During the run every
	/// control is disabled and `observer` is called once per completed item
	/// with the updated progress and the new log entry. Controls are
	/// re-enabled once the loop ends, whether it finished clean, finished
	/// with failures, or was never entered.
	///
	/// Post-run input policy: full success clears the input (nothing left to
	/// retry); any failure leaves it untouched for manual pruning and
	/// resubmission.
	pub async fn run_delete<C, F>(
		&mut self,
		store: &dyn BookmarkStore,
		confirm: C,
		mut observer: F,
	) -> RunOutcome
	where
		C: FnOnce(usize) -> bool,
		F: FnMut(RunUpdate<'_>),
	{
		let items = resolve_items(&self.input);
		if items.is_empty() {
			return RunOutcome::Empty;
		}
		if !confirm(items.len()) {
			debug!(target = "bridge", "purge declined by operator");
			return RunOutcome::Declined;
		}

		self.controls = Controls::all(false);
		self.progress = 0;

		let total = items.len();
		let mut succeeded = 0;

		for (index, item) in items.iter().enumerate() {
			let entry = match store.remove_by_id(&item.id).await {
				Ok(()) => {
					succeeded += 1;
					LogEntry {
						label: item.raw.clone(),
						success: true,
						error: None,
					}
				}
				Err(err) => LogEntry {
					label: item.raw.clone(),
					success: false,
					error: Some(err.to_string()),
				},
			};

			self.progress = progress_percent(index + 1, total);
			self.log.push(entry);
			if let Some(entry) = self.log.last() {
				observer(RunUpdate {
					controls: self.controls,
					progress: self.progress,
					entry,
				});
			}
		}

		self.controls = Controls::all(true);

		let failed = total - succeeded;
		if failed == 0 {
			self.input.clear();
		}

		RunOutcome::Finished(RunSummary {
			total,
			succeeded,
			failed,
		})
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use async_trait::async_trait;
	use bridge_protocol::BookmarkMatch;

	use super::*;
	use crate::store::memory::MemoryStore;
	use crate::store::{self, StoreError};

	fn seeded(ids: &[&str]) -> MemoryStore {
		MemoryStore::with_records(ids.iter().map(|id| BookmarkMatch {
			id: id.to_string(),
			title: String::new(),
			url: format!("https://example.com/{id}"),
			parent_id: None,
		}))
	}

	#[test]
	fn import_structured_scalars() {
		assert_eq!(import_text(r#"["a","b"]"#), "a\nb");
		assert_eq!(import_text(r#"[1, "b", 2]"#), "1\nb\n2");
	}

	#[test]
	fn import_structured_records_take_the_id_field() {
		assert_eq!(import_text(r#"[{"id":"x"}]"#), "x");
		assert_eq!(import_text(r#"[{"id":7,"title":"t"},{"title":"no id"}]"#), "7");
	}

	#[test]
	fn import_falls_back_to_raw_text() {
		assert_eq!(import_text("a\nb"), "a\nb");
		assert_eq!(import_text("{not json"), "{not json");
	}

	#[test]
	fn resolve_drops_blanks_and_comments() {
		let items = resolve_items("a\n#comment\n\n  \n b \n");
		let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
		assert_eq!(ids, ["a", "b"]);
		// labels keep the pre-normalization line
		assert_eq!(items[1].raw, " b ");
	}

	#[test]
	fn progress_rounds_to_nearest_point() {
		assert_eq!(progress_percent(1, 3), 33);
		assert_eq!(progress_percent(2, 3), 67);
		assert_eq!(progress_percent(3, 3), 100);
		assert_eq!(progress_percent(1, 8), 13);
		assert_eq!(progress_percent(0, 5), 0);
	}

	#[tokio::test]
	async fn controls_disabled_during_run_enabled_after() {
		let store = seeded(&["a", "b"]);
		let mut session = PurgeSession::new();
		session.set_input("a\nb");

		let mut seen = Vec::new();
		let outcome = session
			.run_delete(
				&store,
				|_| true,
				|update| {
					seen.push((update.controls, update.progress));
				},
			)
			.await;

		assert!(seen.iter().all(|(controls, _)| controls.all_disabled()));
		assert_eq!(seen.last().unwrap().1, 100);
		assert!(session.controls().all_enabled());
		assert_eq!(
			outcome,
			RunOutcome::Finished(RunSummary {
				total: 2,
				succeeded: 2,
				failed: 0,
			})
		);
	}

	#[tokio::test]
	async fn full_success_clears_the_input() {
		let store = seeded(&["a"]);
		let mut session = PurgeSession::new();
		session.set_input("a");

		session.run_delete(&store, |_| true, |_| {}).await;
		assert_eq!(session.input(), "");
	}

	#[tokio::test]
	async fn partial_failure_keeps_the_input_for_resubmission() {
		let store = seeded(&["a"]);
		let mut session = PurgeSession::new();
		session.set_input("a\nghost");

		let outcome = session.run_delete(&store, |_| true, |_| {}).await;

		assert_eq!(session.input(), "a\nghost");
		assert_eq!(
			outcome,
			RunOutcome::Finished(RunSummary {
				total: 2,
				succeeded: 1,
				failed: 1,
			})
		);
		assert!(session.log()[0].success);
		assert!(!session.log()[1].success);
	}

	#[tokio::test]
	async fn log_labels_carry_the_original_identifier() {
		let store = seeded(&["a"]);
		let mut session = PurgeSession::new();
		session.set_input("  a  ");

		session.run_delete(&store, |_| true, |_| {}).await;
		assert_eq!(session.log()[0].label, "  a  ");
		assert!(session.log()[0].success);
	}

	/// Store that counts calls, for the zero-call guarantees.
	#[derive(Default)]
	struct CountingStore {
		calls: AtomicUsize,
	}

	#[async_trait]
	impl BookmarkStore for CountingStore {
		async fn remove_by_id(&self, id: &str) -> store::Result<()> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Err(StoreError::NotFound(id.to_string()))
		}

		async fn search_by_url(&self, _url: &str) -> store::Result<Vec<BookmarkMatch>> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(Vec::new())
		}
	}

	#[tokio::test]
	async fn declined_confirmation_performs_zero_store_calls() {
		let store = CountingStore::default();
		let mut session = PurgeSession::new();
		session.set_input("a\nb");

		let outcome = session
			.run_delete(
				&store,
				|count| {
					assert_eq!(count, 2);
					false
				},
				|_| {},
			)
			.await;

		assert_eq!(outcome, RunOutcome::Declined);
		assert_eq!(store.calls.load(Ordering::SeqCst), 0);
		assert!(session.controls().all_enabled());
		assert_eq!(session.input(), "a\nb");
	}

	#[tokio::test]
	async fn empty_input_never_enters_the_loop() {
		let store = CountingStore::default();
		let mut session = PurgeSession::new();
		session.set_input("# only comments\n\n");

		let outcome = session
			.run_delete(&store, |_| panic!("confirmation should not be reached"), |_| {})
			.await;

		assert_eq!(outcome, RunOutcome::Empty);
		assert_eq!(store.calls.load(Ordering::SeqCst), 0);
		assert!(session.controls().all_enabled());
	}

	#[tokio::test]
	async fn clipboard_and_file_ingestion_replace_the_input() {
		let mut session = PurgeSession::new();
		session.paste("a\nb");
		assert_eq!(session.input(), "a\nb");

		session.load_file(r#"[{"id":"x"},"y"]"#);
		assert_eq!(session.input(), "x\ny");

		session.clear();
		assert_eq!(session.input(), "");
	}
}
