//! Confirmation dialog state

use futures_signals::signal::Mutable;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Action being confirmed; selects the dialog texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmAction {
	Delete,
	Edit,
	Create,
}

impl ConfirmAction {
	pub fn title(&self) -> &'static str {
		match self {
			Self::Delete => "Confirm deletion",
			Self::Edit => "Confirm edit",
			Self::Create => "Confirm creation",
		}
	}

	pub fn message(&self) -> &'static str {
		match self {
			Self::Delete => "Do you really want to delete this item?",
			Self::Edit => "Are you sure you want to edit this item?",
			Self::Create => "Are you sure you want to create this item?",
		}
	}
}

/// State of the modal confirmation dialog
///
/// At most one question is pending. Opening the dialog again answers the
/// previous question with `false`.
///
/// # Examples
///
/// ```
/// use timetable_pages::confirm::{ConfirmAction, ConfirmDialog};
///
/// let dialog = ConfirmDialog::new();
/// let mut answer = dialog.open(ConfirmAction::Delete);
/// assert!(dialog.is_visible.get());
///
/// dialog.confirm();
/// assert_eq!(answer.try_recv(), Ok(true));
/// assert!(!dialog.is_visible.get());
/// ```
pub struct ConfirmDialog {
	pub is_visible: Mutable<bool>,
	pub title: Mutable<String>,
	pub message: Mutable<String>,
	pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl ConfirmDialog {
	pub fn new() -> Self {
		Self {
			is_visible: Mutable::new(false),
			title: Mutable::new(String::new()),
			message: Mutable::new(String::new()),
			pending: Mutex::new(None),
		}
	}

	/// Show the dialog for `action`; the receiver resolves with the user's answer
	pub fn open(&self, action: ConfirmAction) -> oneshot::Receiver<bool> {
		let (tx, rx) = oneshot::channel();
		if let Some(previous) = self.pending.lock().replace(tx) {
			let _ = previous.send(false);
		}
		self.title.set(action.title().to_string());
		self.message.set(action.message().to_string());
		self.is_visible.set(true);
		rx
	}

	/// Show the dialog and wait for the answer
	///
	/// A dialog dropped without an answer counts as a refusal.
	pub async fn ask(&self, action: ConfirmAction) -> bool {
		self.open(action).await.unwrap_or(false)
	}

	pub fn confirm(&self) -> bool {
		self.answer(true)
	}

	pub fn cancel(&self) -> bool {
		self.answer(false)
	}

	/// Hide the dialog and resolve the pending question, if any
	fn answer(&self, value: bool) -> bool {
		self.is_visible.set(false);
		match self.pending.lock().take() {
			Some(tx) => tx.send(value).is_ok(),
			None => false,
		}
	}
}

impl Default for ConfirmDialog {
	fn default() -> Self {
		Self::new()
	}
}
