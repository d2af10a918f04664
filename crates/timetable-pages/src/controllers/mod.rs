//! Generic page controllers
//!
//! One controller per page kind, each generic over the [`Entity`] it manages
//! and driven through a [`DynResource`]. Controllers share a [`PageContext`]
//! (navigator, notifications, confirm dialog) and own a [`PageScope`] that
//! cancels their in-flight work when the page goes away.
//!
//! Every failure reaches the user as exactly one error notification, except
//! cancellation which is silent.
//!
//! [`Entity`]: timetable_types::Entity
//! [`DynResource`]: timetable_client::DynResource

pub mod create;
pub mod dashboard;
pub mod edit;
pub mod list;
pub mod scope;
pub mod view;

pub use create::CreateController;
pub use dashboard::{DashboardController, DashboardCounts};
pub use edit::EditController;
pub use list::{ListChange, ListController};
pub use scope::PageScope;
pub use view::ViewController;

use crate::confirm::ConfirmDialog;
use crate::navigation::{NavigationError, Navigator};
use crate::notification::NotificationEngine;
use std::sync::Arc;
use thiserror::Error;
use timetable_types::{ApiError, ValidationError};

pub(crate) const LOAD_ERROR_MESSAGE: &str = "Error loading data.";

/// Why a page operation did not complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
	/// The page scope was cancelled while the operation was pending
	#[error("Operation cancelled")]
	Cancelled,

	/// The `id` path parameter is missing or not a number
	#[error("Invalid ID in URL.")]
	InvalidId,

	/// The item has no identifier
	#[error("Invalid item.")]
	InvalidItem,

	/// The submitted data cannot be sent as is
	#[error("Invalid data.")]
	InvalidData,

	/// The form was submitted without its required values
	#[error("Please fill in the required fields.")]
	IncompleteForm,

	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error(transparent)]
	Api(#[from] ApiError),

	#[error(transparent)]
	Navigation(#[from] NavigationError),
}

impl PageError {
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

pub type PageResult<T> = Result<T, PageError>;

/// Services every page controller works with
#[derive(Clone)]
pub struct PageContext {
	pub navigator: Arc<Navigator>,
	pub notifications: NotificationEngine,
	pub confirm: Arc<ConfirmDialog>,
}

impl PageContext {
	pub fn new(
		navigator: Arc<Navigator>,
		notifications: NotificationEngine,
		confirm: Arc<ConfirmDialog>,
	) -> Self {
		Self {
			navigator,
			notifications,
			confirm,
		}
	}

	/// Surface `error` as one error notification; `message` replaces the
	/// error's own text when given. Cancellation is not reported.
	pub(crate) fn report(&self, error: &PageError, message: Option<&str>) {
		match error {
			PageError::Cancelled => {
				tracing::debug!("page operation cancelled");
			}
			_ => {
				tracing::warn!(%error, "page operation failed");
				let text = message.map_or_else(|| error.to_string(), str::to_string);
				self.notifications.error(text);
			}
		}
	}

	/// Report `error` and hand it back as the operation's result
	pub(crate) fn fail<T>(&self, error: PageError, message: Option<&str>) -> PageResult<T> {
		self.report(&error, message);
		Err(error)
	}

	/// The numeric `id` path parameter of the current route
	pub(crate) fn route_id(&self) -> PageResult<i64> {
		match self.navigator.number_param("id") {
			Some(id) => Ok(id),
			None => self.fail(PageError::InvalidId, None),
		}
	}

	/// Navigate, reporting a failed navigation
	pub(crate) fn go(&self, path: &str) -> PageResult<()> {
		match self.navigator.navigate_to(path) {
			Ok(()) => Ok(()),
			Err(error) => self.fail(error.into(), None),
		}
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use super::*;
	use crate::routing::RouteDefinition;

	/// Route table with the list/create/view/edit pages of one endpoint
	pub(crate) fn crud_routes(endpoint: &str) -> Vec<RouteDefinition> {
		vec![
			RouteDefinition::redirect("", "/dashboard"),
			RouteDefinition::new("dashboard"),
			RouteDefinition::new(endpoint),
			RouteDefinition::new(format!("{endpoint}/create")),
			RouteDefinition::new(format!("{endpoint}/view/:id")),
			RouteDefinition::new(format!("{endpoint}/edit/:id")),
		]
	}

	/// Context without a runtime for timers: notifications stay visible
	pub(crate) fn context(endpoint: &str) -> PageContext {
		PageContext::new(
			Arc::new(Navigator::new(crud_routes(endpoint))),
			NotificationEngine::with_runtime(None),
			Arc::new(ConfirmDialog::new()),
		)
	}

	pub(crate) fn messages(ctx: &PageContext) -> Vec<String> {
		ctx.notifications
			.visible()
			.into_iter()
			.map(|n| n.message)
			.collect()
	}
}
