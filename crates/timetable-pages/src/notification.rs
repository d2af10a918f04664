//! Toast notification engine
//!
//! At most [`MAX_VISIBLE`] notifications are visible at once; the rest wait
//! in a FIFO queue. Each visible notification counts down on its own
//! [`TICK`]-period task and closes itself when the countdown runs out.
//! Showing a message that is already visible restarts its countdown
//! instead of adding a duplicate.
//!
//! Every change republishes the full visible list on a `futures-signals`
//! [`Mutable`], while the engine's lock is still held, so observers never see
//! the gap between a close and the promotion that follows it.
//!
//! ## Example
//!
//! ```
//! use timetable_pages::notification::{NotificationEngine, NotificationKind};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = NotificationEngine::new();
//! let id = engine.show("Saved", NotificationKind::Success);
//! assert_eq!(engine.show("Saved", NotificationKind::Success), id);
//! assert_eq!(engine.visible().len(), 1);
//! engine.close(id);
//! assert!(engine.visible().is_empty());
//! # }
//! ```

use futures_signals::signal::{Mutable, MutableSignalCloned};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum number of simultaneously visible notifications
pub const MAX_VISIBLE: usize = 3;

/// Countdown period; each tick removes this much from `remaining_ms`
pub const TICK: Duration = Duration::from_millis(50);

/// Lifetime of a notification shown without an explicit duration
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

const TICK_MS: u64 = 50;

/// Visual category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
	Success,
	Error,
	#[default]
	Info,
}

impl NotificationKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			NotificationKind::Success => "success",
			NotificationKind::Error => "error",
			NotificationKind::Info => "info",
		}
	}
}

/// One toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub id: u64,
	pub message: String,
	pub kind: NotificationKind,
	/// Time left before the toast closes itself
	pub remaining_ms: u64,
	/// Countdown start value, for the progress bar
	pub total_ms: u64,
}

impl Notification {
	/// Share of the countdown left, 0 to 100
	pub fn progress_percent(&self) -> f64 {
		if self.total_ms == 0 {
			return 0.0;
		}
		self.remaining_ms as f64 / self.total_ms as f64 * 100.0
	}

	/// Style class of the toast container
	pub fn css_class(&self) -> String {
		format!("notification {}", self.kind.as_str())
	}
}

struct VisibleEntry {
	notification: Notification,
	ticker: Option<JoinHandle<()>>,
}

struct EngineState {
	next_id: u64,
	visible: Vec<VisibleEntry>,
	queue: VecDeque<Notification>,
	shut_down: bool,
}

struct EngineInner {
	state: Mutex<EngineState>,
	published: Mutable<Vec<Notification>>,
	runtime: Option<Handle>,
	default_duration: Duration,
}

impl EngineInner {
	fn publish(&self, state: &EngineState) {
		self.published.set(
			state
				.visible
				.iter()
				.map(|entry| entry.notification.clone())
				.collect(),
		);
	}

	/// Promote queued notifications into free slots, oldest first
	fn process_queue(self: &Arc<Self>, state: &mut EngineState) {
		while state.visible.len() < MAX_VISIBLE {
			let Some(notification) = state.queue.pop_front() else {
				break;
			};
			let id = notification.id;
			state.visible.push(VisibleEntry {
				notification,
				ticker: None,
			});
			self.publish(state);

			let ticker = if state.shut_down {
				None
			} else {
				self.spawn_ticker(id)
			};
			if let Some(entry) = state.visible.last_mut() {
				entry.ticker = ticker;
			}
		}
	}

	fn spawn_ticker(self: &Arc<Self>, id: u64) -> Option<JoinHandle<()>> {
		let Some(runtime) = &self.runtime else {
			tracing::warn!(id, "no async runtime, notification will not expire");
			return None;
		};
		let engine: Weak<EngineInner> = Arc::downgrade(self);
		Some(runtime.spawn(async move {
			let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
			loop {
				interval.tick().await;
				let Some(engine) = engine.upgrade() else {
					break;
				};
				if !engine.tick(id) {
					break;
				}
			}
		}))
	}

	/// Apply one countdown step; returns whether the ticker should keep running
	fn tick(self: &Arc<Self>, id: u64) -> bool {
		let mut state = self.state.lock();
		let Some(entry) = state
			.visible
			.iter_mut()
			.find(|entry| entry.notification.id == id)
		else {
			return false;
		};

		let remaining = entry.notification.remaining_ms.saturating_sub(TICK_MS);
		entry.notification.remaining_ms = remaining;
		if remaining == 0 {
			// The ticker is finishing on its own
			entry.ticker = None;
			self.close_locked(&mut state, id);
			return false;
		}
		self.publish(&state);
		true
	}

	fn close_locked(self: &Arc<Self>, state: &mut EngineState, id: u64) {
		if let Some(pos) = state
			.visible
			.iter()
			.position(|entry| entry.notification.id == id)
		{
			let entry = state.visible.remove(pos);
			if let Some(ticker) = entry.ticker {
				ticker.abort();
			}
			tracing::debug!(id, "notification closed");
		}
		self.publish(state);
		self.process_queue(state);
	}
}

impl Drop for EngineInner {
	fn drop(&mut self) {
		for entry in self.state.get_mut().visible.iter_mut() {
			if let Some(ticker) = entry.ticker.take() {
				ticker.abort();
			}
		}
	}
}

/// Handle to the notification engine; clones share the same engine.
///
/// Countdown tasks are spawned on the tokio runtime that was current when
/// the engine was created. Dropping the last handle cancels them.
#[derive(Clone)]
pub struct NotificationEngine {
	inner: Arc<EngineInner>,
}

impl NotificationEngine {
	/// Create an engine bound to the current tokio runtime, if any.
	///
	/// Without a runtime notifications still queue and show, but never
	/// expire on their own.
	pub fn new() -> Self {
		Self::with_runtime(Handle::try_current().ok())
	}

	/// Create an engine spawning its countdown tasks on `runtime`
	pub fn with_runtime(runtime: Option<Handle>) -> Self {
		Self::with_duration(runtime, DEFAULT_DURATION)
	}

	/// Like [`with_runtime`](Self::with_runtime), with `default_duration`
	/// replacing [`DEFAULT_DURATION`] for [`show`](Self::show)
	pub fn with_duration(runtime: Option<Handle>, default_duration: Duration) -> Self {
		if runtime.is_none() {
			tracing::warn!("notification engine created outside of a tokio runtime");
		}
		Self {
			inner: Arc::new(EngineInner {
				state: Mutex::new(EngineState {
					next_id: 0,
					visible: Vec::new(),
					queue: VecDeque::new(),
					shut_down: false,
				}),
				published: Mutable::new(Vec::new()),
				runtime,
				default_duration,
			}),
		}
	}

	/// Show `message` for the engine's default duration
	pub fn show(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
		self.show_for(message, kind, self.inner.default_duration)
	}

	/// Show `message` for `duration` and return the notification id.
	///
	/// If a visible notification already carries exactly this message its
	/// countdown restarts at `duration` and its id is returned.
	pub fn show_for(
		&self,
		message: impl Into<String>,
		kind: NotificationKind,
		duration: Duration,
	) -> u64 {
		let message = message.into();
		let total_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
		let mut state = self.inner.state.lock();

		if let Some(entry) = state
			.visible
			.iter_mut()
			.find(|entry| entry.notification.message == message)
		{
			entry.notification.remaining_ms = total_ms;
			entry.notification.total_ms = total_ms;
			let id = entry.notification.id;
			tracing::debug!(id, "notification countdown restarted");
			self.inner.publish(&state);
			return id;
		}

		state.next_id += 1;
		let id = state.next_id;
		tracing::debug!(id, kind = kind.as_str(), "notification queued");
		state.queue.push_back(Notification {
			id,
			message,
			kind,
			remaining_ms: total_ms,
			total_ms,
		});
		self.inner.process_queue(&mut state);
		id
	}

	pub fn success(&self, message: impl Into<String>) -> u64 {
		self.show(message, NotificationKind::Success)
	}

	pub fn error(&self, message: impl Into<String>) -> u64 {
		self.show(message, NotificationKind::Error)
	}

	pub fn info(&self, message: impl Into<String>) -> u64 {
		self.show(message, NotificationKind::Info)
	}

	/// Close a visible notification and promote the next queued one
	pub fn close(&self, id: u64) {
		let mut state = self.inner.state.lock();
		self.inner.close_locked(&mut state, id);
	}

	/// Snapshot of the visible notifications, in display order
	pub fn visible(&self) -> Vec<Notification> {
		self.inner.published.get_cloned()
	}

	/// Number of notifications waiting for a free slot
	pub fn queued(&self) -> usize {
		self.inner.state.lock().queue.len()
	}

	/// Signal of the visible notifications
	pub fn signal(&self) -> MutableSignalCloned<Vec<Notification>> {
		self.inner.published.signal_cloned()
	}

	/// Cancel every countdown; later promotions get no countdown either
	pub fn shutdown(&self) {
		let mut state = self.inner.state.lock();
		state.shut_down = true;
		for entry in state.visible.iter_mut() {
			if let Some(ticker) = entry.ticker.take() {
				ticker.abort();
			}
		}
		tracing::debug!("notification engine shut down");
	}
}

impl Default for NotificationEngine {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::StreamExt;
	use futures_signals::signal::SignalExt;
	use rstest::rstest;
	use tokio::time::sleep;

	fn ids(engine: &NotificationEngine) -> Vec<u64> {
		engine.visible().iter().map(|n| n.id).collect()
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_at_most_three_visible() {
		// Arrange
		let engine = NotificationEngine::new();

		// Act
		for i in 0..5 {
			engine.info(format!("message {}", i));
		}

		// Assert
		assert_eq!(ids(&engine), vec![1, 2, 3]);
		assert_eq!(engine.queued(), 2);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_duplicate_message_restarts_countdown() {
		// Arrange
		let engine = NotificationEngine::new();
		let first = engine.error("Server unreachable");
		sleep(Duration::from_millis(1010)).await;
		assert_eq!(engine.visible()[0].remaining_ms, 4000);

		// Act
		let second = engine.error("Server unreachable");

		// Assert
		assert_eq!(first, second);
		let visible = engine.visible();
		assert_eq!(visible.len(), 1);
		assert_eq!(visible[0].remaining_ms, 5000);
		assert_eq!(visible[0].total_ms, 5000);
		assert_eq!(engine.queued(), 0);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_coalescing_is_case_sensitive() {
		let engine = NotificationEngine::new();

		engine.info("saved");
		engine.info("Saved");

		assert_eq!(engine.visible().len(), 2);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_only_visible_messages_coalesce() {
		// Arrange
		let engine = NotificationEngine::new();
		for m in ["a", "b", "c", "d"] {
			engine.info(m);
		}

		// Act
		engine.info("d");

		// Assert
		assert_eq!(engine.queued(), 2);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_close_promotes_queue_head_in_order() {
		// Arrange
		let engine = NotificationEngine::new();
		for i in 0..5 {
			engine.info(format!("message {}", i));
		}

		// Act
		engine.close(1);

		// Assert
		assert_eq!(ids(&engine), vec![2, 3, 4]);
		assert_eq!(engine.queued(), 1);

		engine.close(3);
		assert_eq!(ids(&engine), vec![2, 4, 5]);
		assert_eq!(engine.queued(), 0);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_close_unknown_id_is_harmless() {
		let engine = NotificationEngine::new();
		engine.info("only");

		engine.close(42);

		assert_eq!(ids(&engine), vec![1]);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_countdown_reaches_zero_then_closes() {
		// Arrange
		let engine = NotificationEngine::new();
		engine.show_for("short", NotificationKind::Info, Duration::from_millis(150));

		// Act & Assert
		sleep(Duration::from_millis(60)).await;
		assert_eq!(engine.visible()[0].remaining_ms, 100);
		sleep(Duration::from_millis(50)).await;
		assert_eq!(engine.visible()[0].remaining_ms, 50);
		sleep(Duration::from_millis(50)).await;
		assert!(engine.visible().is_empty());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_uneven_duration_never_goes_negative() {
		// Arrange
		let engine = NotificationEngine::new();
		engine.show_for("odd", NotificationKind::Info, Duration::from_millis(120));

		// Act & Assert
		sleep(Duration::from_millis(110)).await;
		assert_eq!(engine.visible()[0].remaining_ms, 20);
		sleep(Duration::from_millis(50)).await;
		assert!(engine.visible().is_empty());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_expiry_promotes_waiting_notification() {
		// Arrange
		let engine = NotificationEngine::new();
		for i in 0..3 {
			engine.show_for(format!("fast {}", i), NotificationKind::Info, Duration::from_millis(100));
		}
		engine.show_for("late", NotificationKind::Success, Duration::from_millis(100));
		assert_eq!(engine.queued(), 1);

		// Act
		sleep(Duration::from_millis(110)).await;

		// Assert
		let visible = engine.visible();
		assert_eq!(visible.len(), 1);
		assert_eq!(visible[0].message, "late");
		assert_eq!(visible[0].remaining_ms, 100);

		sleep(Duration::from_millis(110)).await;
		assert!(engine.visible().is_empty());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_shutdown_cancels_countdowns() {
		// Arrange
		let engine = NotificationEngine::new();
		engine.show_for("sticky", NotificationKind::Info, Duration::from_millis(100));

		// Act
		engine.shutdown();
		sleep(Duration::from_secs(1)).await;

		// Assert
		assert_eq!(engine.visible().len(), 1);
		assert_eq!(engine.visible()[0].remaining_ms, 100);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_signal_publishes_visible_list() {
		// Arrange
		let engine = NotificationEngine::new();
		let mut stream = engine.signal().to_stream();
		assert_eq!(stream.next().await, Some(Vec::new()));

		// Act
		engine.success("Created");

		// Assert
		let published = stream.next().await.unwrap();
		assert_eq!(published.len(), 1);
		assert_eq!(published[0].css_class(), "notification success");
	}

	#[rstest]
	fn test_without_runtime_notifications_stay() {
		let engine = NotificationEngine::with_runtime(None);

		engine.info("no timers");

		assert_eq!(engine.visible().len(), 1);
		assert_eq!(engine.visible()[0].remaining_ms, 5000);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_configured_default_duration() {
		let engine =
			NotificationEngine::with_duration(Some(Handle::current()), Duration::from_millis(200));

		engine.error("brief");

		assert_eq!(engine.visible()[0].total_ms, 200);
		sleep(Duration::from_millis(210)).await;
		assert!(engine.visible().is_empty());
	}

	#[rstest]
	#[case(5000, 5000, 100.0)]
	#[case(2500, 5000, 50.0)]
	#[case(0, 5000, 0.0)]
	#[case(0, 0, 0.0)]
	fn test_progress_percent(#[case] remaining_ms: u64, #[case] total_ms: u64, #[case] expected: f64) {
		let notification = Notification {
			id: 1,
			message: String::new(),
			kind: NotificationKind::Info,
			remaining_ms,
			total_ms,
		};

		assert_eq!(notification.progress_percent(), expected);
	}
}
