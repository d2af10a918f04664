//! Paginated list page

use super::{LOAD_ERROR_MESSAGE, PageContext, PageError, PageResult, PageScope};
use crate::confirm::ConfirmAction;
use futures_signals::signal::{Mutable, MutableSignalCloned};
use std::sync::atomic::{AtomicU64, Ordering};
use timetable_client::DynResource;
use timetable_types::{Entity, ListQuery, Page};

const DELETED_MESSAGE: &str = "Item deleted successfully.";

/// Partial update of the list query; unset fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListChange {
	pub page_number: Option<u64>,
	pub page_size: Option<u64>,
	pub filter: Option<String>,
}

impl ListChange {
	pub fn page(page_number: u64) -> Self {
		Self {
			page_number: Some(page_number),
			..Default::default()
		}
	}

	pub fn page_size(page_size: u64) -> Self {
		Self {
			page_size: Some(page_size),
			..Default::default()
		}
	}

	pub fn filter(filter: impl Into<String>) -> Self {
		Self {
			filter: Some(filter.into()),
			..Default::default()
		}
	}

	/// Merge into `current`; a new filter without an explicit page starts over at page 1
	pub fn apply(self, current: &ListQuery) -> ListQuery {
		let filter_changed = self
			.filter
			.as_ref()
			.is_some_and(|filter| *filter != current.filter);
		let page_number = match self.page_number {
			Some(page) => page,
			None if filter_changed => 1,
			None => current.page_number,
		};

		ListQuery {
			page_number: page_number.max(1),
			page_size: self.page_size.unwrap_or(current.page_size),
			filter: self.filter.unwrap_or_else(|| current.filter.clone()),
		}
	}
}

/// State and actions of a list page
///
/// The controller's query is the only source of paging and filter state;
/// table, pagination and filter components send [`ListChange`]s to it.
pub struct ListController<T: Entity> {
	resource: DynResource<T>,
	ctx: PageContext,
	scope: PageScope,
	query: Mutable<ListQuery>,
	data: Mutable<Option<Page<T>>>,
	loading: Mutable<bool>,
	generation: AtomicU64,
}

impl<T: Entity> ListController<T> {
	pub fn new(resource: DynResource<T>, ctx: PageContext) -> Self {
		Self {
			resource,
			ctx,
			scope: PageScope::new(),
			query: Mutable::new(ListQuery::default()),
			data: Mutable::new(None),
			loading: Mutable::new(false),
			generation: AtomicU64::new(0),
		}
	}

	/// Start with `page_size` rows per page instead of the default
	pub fn with_page_size(self, page_size: u64) -> Self {
		self.query.lock_mut().page_size = page_size.max(1);
		self
	}

	pub fn endpoint(&self) -> &str {
		self.resource.endpoint()
	}

	pub fn query(&self) -> ListQuery {
		self.query.get_cloned()
	}

	pub fn data(&self) -> Option<Page<T>> {
		self.data.get_cloned()
	}

	pub fn data_signal(&self) -> MutableSignalCloned<Option<Page<T>>> {
		self.data.signal_cloned()
	}

	pub fn is_loading(&self) -> bool {
		self.loading.get()
	}

	pub fn scope(&self) -> &PageScope {
		&self.scope
	}

	/// Load the first page with the current query
	pub async fn init(&self) -> PageResult<()> {
		self.load_data(ListChange::default()).await
	}

	/// Merge `change` into the query and fetch the matching page
	///
	/// A response that arrives after a newer load was started is dropped.
	///
	/// # Errors
	///
	/// Fails with the resource error (notified as "Error loading data.") or
	/// with [`PageError::Cancelled`] once the page is destroyed.
	pub async fn load_data(&self, change: ListChange) -> PageResult<()> {
		let query = change.apply(&self.query.get_cloned());
		self.query.set_neq(query.clone());
		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		self.loading.set_neq(true);

		let result = self.scope.call(self.resource.fetch_page(&query)).await;
		if result.as_ref().is_err_and(PageError::is_cancelled) {
			return self.ctx.fail(PageError::Cancelled, None);
		}
		if self.generation.load(Ordering::SeqCst) != generation {
			tracing::debug!(endpoint = self.endpoint(), "dropping stale list response");
			return Ok(());
		}

		self.loading.set_neq(false);
		match result {
			Ok(page) => {
				tracing::debug!(
					endpoint = self.endpoint(),
					page = page.page_number,
					items = page.items.len(),
					"list page loaded"
				);
				self.data.set(Some(page));
				Ok(())
			}
			Err(error) => self.ctx.fail(error, Some(LOAD_ERROR_MESSAGE)),
		}
	}

	/// Ask for confirmation, delete `item` and reload the current page
	///
	/// Returns `Ok(false)` when the user declined.
	pub async fn delete(&self, item: &T) -> PageResult<bool> {
		let Some(id) = item.id() else {
			return self.ctx.fail(PageError::InvalidItem, None);
		};

		if !self.scope.run(self.ctx.confirm.ask(ConfirmAction::Delete)).await? {
			return Ok(false);
		}

		if let Err(error) = self.scope.call(self.resource.delete(id)).await {
			return self.ctx.fail(error, None);
		}
		self.ctx.notifications.success(DELETED_MESSAGE);
		self.load_data(ListChange::default()).await?;
		Ok(true)
	}

	/// Open the view page of `item`
	pub fn view(&self, item: &T) -> PageResult<()> {
		self.open(item, "view")
	}

	/// Open the edit page of `item`
	pub fn edit(&self, item: &T) -> PageResult<()> {
		self.open(item, "edit")
	}

	fn open(&self, item: &T, action: &str) -> PageResult<()> {
		let Some(id) = item.id() else {
			return self.ctx.fail(PageError::InvalidItem, None);
		};
		self.ctx.go(&format!("/{}/{action}/{id}", self.endpoint()))
	}

	/// Tear the page down; pending loads resolve as cancelled
	pub fn destroy(&self) {
		self.scope.cancel();
	}
}
