//! Read-only detail page

use super::{LOAD_ERROR_MESSAGE, PageContext, PageResult, PageScope};
use futures_signals::signal::{Mutable, MutableSignalCloned};
use timetable_client::DynResource;
use timetable_types::Entity;

pub struct ViewController<T: Entity> {
	resource: DynResource<T>,
	ctx: PageContext,
	scope: PageScope,
	data: Mutable<Option<T>>,
}

impl<T: Entity> ViewController<T> {
	pub fn new(resource: DynResource<T>, ctx: PageContext) -> Self {
		Self {
			resource,
			ctx,
			scope: PageScope::new(),
			data: Mutable::new(None),
		}
	}

	pub fn data(&self) -> Option<T> {
		self.data.get_cloned()
	}

	pub fn data_signal(&self) -> MutableSignalCloned<Option<T>> {
		self.data.signal_cloned()
	}

	/// Load the record named by the `id` path parameter
	pub async fn init(&self) -> PageResult<T> {
		let id = self.ctx.route_id()?;
		match self.scope.call(self.resource.fetch_by_id(id)).await {
			Ok(item) => {
				self.data.set(Some(item.clone()));
				Ok(item)
			}
			Err(error) => self.ctx.fail(error, Some(LOAD_ERROR_MESSAGE)),
		}
	}

	/// Open the edit page of the loaded record
	pub fn edit(&self) -> PageResult<()> {
		let id = self.ctx.route_id()?;
		self.ctx.go(&format!("/{}/edit/{id}", self.resource.endpoint()))
	}

	pub fn cancel(&self) -> bool {
		self.ctx.navigator.back()
	}

	pub fn destroy(&self) {
		self.scope.cancel();
	}
}
