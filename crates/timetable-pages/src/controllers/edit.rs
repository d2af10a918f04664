//! Edit page

use super::{LOAD_ERROR_MESSAGE, PageContext, PageError, PageResult, PageScope};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use timetable_client::DynResource;
use timetable_types::Entity;

const UPDATED_MESSAGE: &str = "Data updated successfully!";

/// State and actions of an edit page
///
/// The record to edit is named by the `id` path parameter of the current
/// route. Editors with extra option lists build on top of this controller
/// and run their own loads inside its [`scope`](Self::scope).
pub struct EditController<T: Entity> {
	resource: DynResource<T>,
	ctx: PageContext,
	scope: PageScope,
	id: Mutable<Option<i64>>,
	data: Mutable<Option<T>>,
}

impl<T: Entity> EditController<T> {
	pub fn new(resource: DynResource<T>, ctx: PageContext) -> Self {
		Self {
			resource,
			ctx,
			scope: PageScope::new(),
			id: Mutable::new(None),
			data: Mutable::new(None),
		}
	}

	pub fn id(&self) -> Option<i64> {
		self.id.get()
	}

	pub fn data(&self) -> Option<T> {
		self.data.get_cloned()
	}

	pub fn data_signal(&self) -> MutableSignalCloned<Option<T>> {
		self.data.signal_cloned()
	}

	pub fn context(&self) -> &PageContext {
		&self.ctx
	}

	pub fn scope(&self) -> &PageScope {
		&self.scope
	}

	/// Read the id from the URL and load the record
	///
	/// # Errors
	///
	/// A missing or non-numeric id fails with [`PageError::InvalidId`]
	/// before any request; a failed load is notified as "Error loading data.".
	pub async fn init(&self) -> PageResult<T> {
		let id = self.ctx.route_id()?;
		self.id.set(Some(id));

		match self.scope.call(self.resource.fetch_by_id(id)).await {
			Ok(item) => {
				self.data.set(Some(item.clone()));
				Ok(item)
			}
			Err(error) => self.ctx.fail(error, Some(LOAD_ERROR_MESSAGE)),
		}
	}

	/// Save `entity` under the loaded id, then return to the list page
	///
	/// `entity` without an id takes the id read by [`init`](Self::init).
	pub async fn submit(&self, entity: Option<T>) -> PageResult<T> {
		let Some(mut entity) = entity else {
			return self.ctx.fail(PageError::InvalidData, None);
		};
		if entity.id().is_none()
			&& let Some(id) = self.id()
		{
			entity.set_id(id);
		}
		let Some(id) = entity.id() else {
			return self.ctx.fail(PageError::InvalidData, None);
		};
		if let Err(error) = entity.validate() {
			return self.ctx.fail(error.into(), None);
		}

		let updated = match self.scope.call(self.resource.update(id, &entity)).await {
			Ok(updated) => updated,
			Err(error) => return self.ctx.fail(error, None),
		};
		tracing::debug!(endpoint = self.resource.endpoint(), id, "record updated");

		self.ctx.notifications.success(UPDATED_MESSAGE);
		self.data.set(Some(updated.clone()));
		self.ctx.go(&format!("/{}", self.resource.endpoint()))?;
		Ok(updated)
	}

	pub fn cancel(&self) -> bool {
		self.ctx.navigator.back()
	}

	pub fn destroy(&self) {
		self.scope.cancel();
	}
}
