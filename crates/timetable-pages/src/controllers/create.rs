//! Create page

use super::{PageContext, PageError, PageResult, PageScope};
use futures_signals::signal::Mutable;
use timetable_client::DynResource;
use timetable_types::Entity;

const CREATED_MESSAGE: &str = "Record created successfully.";

pub struct CreateController<T: Entity> {
	resource: DynResource<T>,
	ctx: PageContext,
	scope: PageScope,
	data: Mutable<Option<T>>,
}

impl<T: Entity> CreateController<T> {
	pub fn new(resource: DynResource<T>, ctx: PageContext) -> Self {
		Self {
			resource,
			ctx,
			scope: PageScope::new(),
			data: Mutable::new(None),
		}
	}

	/// The record returned by the last successful submission
	pub fn data(&self) -> Option<T> {
		self.data.get_cloned()
	}

	pub fn context(&self) -> &PageContext {
		&self.ctx
	}

	pub fn scope(&self) -> &PageScope {
		&self.scope
	}

	/// Validate and create `entity`, then return to the list page
	///
	/// `None` stands for a form that is not complete; no request is made.
	///
	/// # Errors
	///
	/// Validation failures, resource errors and navigation errors are
	/// notified and returned. Cancellation is returned silently.
	pub async fn submit(&self, entity: Option<T>) -> PageResult<T> {
		let Some(entity) = entity else {
			return self.ctx.fail(PageError::IncompleteForm, None);
		};
		if let Err(error) = entity.validate() {
			return self.ctx.fail(error.into(), None);
		}

		let created = match self.scope.call(self.resource.create(&entity)).await {
			Ok(created) => created,
			Err(error) => return self.ctx.fail(error, None),
		};
		tracing::debug!(endpoint = self.resource.endpoint(), id = ?created.id(), "record created");

		self.ctx.notifications.success(CREATED_MESSAGE);
		self.data.set(Some(created.clone()));
		self.ctx.go(&format!("/{}", self.resource.endpoint()))?;
		Ok(created)
	}

	/// Leave the page without saving
	pub fn cancel(&self) -> bool {
		self.ctx.navigator.back()
	}

	pub fn destroy(&self) {
		self.scope.cancel();
	}
}
