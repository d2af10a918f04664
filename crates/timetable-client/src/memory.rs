//! In-process [`Resource`] backed by a map
//!
//! Mirrors the backend's observable behaviour closely enough to drive page
//! controllers without a server: sequential ids, case-insensitive filtering
//! over the serialised entity, 1-based pagination. It also records every
//! call and can be told to fail or to answer slowly.

use crate::resource::Resource;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::Duration;
use timetable_types::{ApiError, ApiResult, Entity, ListQuery, Page};

struct MemoryState<T> {
	items: BTreeMap<i64, T>,
	next_id: i64,
	failure: Option<ApiError>,
	delay: Option<Duration>,
	calls: Vec<&'static str>,
	last_query: Option<ListQuery>,
}

/// In-memory resource for `T`
pub struct MemoryResource<T> {
	state: Mutex<MemoryState<T>>,
}

impl<T: Entity> MemoryResource<T> {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(MemoryState {
				items: BTreeMap::new(),
				next_id: 1,
				failure: None,
				delay: None,
				calls: Vec::new(),
				last_query: None,
			}),
		}
	}

	/// Seed the store; items without an id get the next free one
	pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
		let resource = Self::new();
		{
			let mut state = resource.state.lock();
			for item in items {
				Self::insert(&mut state, item);
			}
		}
		resource
	}

	fn insert(state: &mut MemoryState<T>, mut item: T) -> T {
		let id = match item.id() {
			Some(id) => id,
			None => {
				let id = state.next_id;
				item.set_id(id);
				id
			}
		};
		state.next_id = state.next_id.max(id + 1);
		state.items.insert(id, item.clone());
		item
	}

	/// Make every following call fail with `error` until cleared with `None`
	pub fn set_failure(&self, error: Option<ApiError>) {
		self.state.lock().failure = error;
	}

	/// Delay every following call
	pub fn set_delay(&self, delay: Option<Duration>) {
		self.state.lock().delay = delay;
	}

	/// Names of the operations called so far, in order
	pub fn calls(&self) -> Vec<&'static str> {
		self.state.lock().calls.clone()
	}

	pub fn last_query(&self) -> Option<ListQuery> {
		self.state.lock().last_query.clone()
	}

	/// Snapshot of the stored items, ordered by id
	pub fn items(&self) -> Vec<T> {
		self.state.lock().items.values().cloned().collect()
	}

	/// Record the call, wait out the configured delay, then surface the failure if any
	async fn enter(&self, operation: &'static str) -> ApiResult<()> {
		let delay = {
			let mut state = self.state.lock();
			state.calls.push(operation);
			state.delay
		};
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		match self.state.lock().failure.clone() {
			Some(error) => Err(error),
			None => Ok(()),
		}
	}

	fn not_found(id: i64) -> ApiError {
		ApiError::backend(format!("{} {} not found", T::ENDPOINT, id))
	}

	fn matches_filter(item: &T, needle: &str) -> bool {
		if needle.is_empty() {
			return true;
		}
		serde_json::to_string(item)
			.map(|json| json.to_lowercase().contains(needle))
			.unwrap_or(false)
	}
}

impl<T: Entity> Default for MemoryResource<T> {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl<T: Entity> Resource for MemoryResource<T> {
	type Entity = T;

	async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<T>> {
		self.enter("fetch_page").await?;
		let mut state = self.state.lock();
		state.last_query = Some(query.clone());

		let needle = query.filter.trim().to_lowercase();
		let matching: Vec<T> = state
			.items
			.values()
			.filter(|item| Self::matches_filter(item, &needle))
			.cloned()
			.collect();
		let total_items = matching.len() as u64;
		let skip = query.page_number.saturating_sub(1).saturating_mul(query.page_size);
		let items = matching
			.into_iter()
			.skip(usize::try_from(skip).unwrap_or(usize::MAX))
			.take(usize::try_from(query.page_size).unwrap_or(usize::MAX))
			.collect();

		Ok(Page {
			page_number: query.page_number,
			page_size: query.page_size,
			total_items,
			items,
		})
	}

	async fn fetch_all(&self) -> ApiResult<Vec<T>> {
		self.enter("fetch_all").await?;
		Ok(self.items())
	}

	async fn fetch_by_id(&self, id: i64) -> ApiResult<T> {
		self.enter("fetch_by_id").await?;
		self.state
			.lock()
			.items
			.get(&id)
			.cloned()
			.ok_or_else(|| Self::not_found(id))
	}

	async fn create(&self, entity: &T) -> ApiResult<T> {
		self.enter("create").await?;
		let mut item = entity.clone();
		let mut state = self.state.lock();
		let id = state.next_id;
		item.set_id(id);
		Ok(Self::insert(&mut state, item))
	}

	async fn update(&self, id: i64, entity: &T) -> ApiResult<T> {
		self.enter("update").await?;
		let mut state = self.state.lock();
		if !state.items.contains_key(&id) {
			return Err(Self::not_found(id));
		}
		let mut item = entity.clone();
		item.set_id(id);
		state.items.insert(id, item.clone());
		Ok(item)
	}

	async fn delete(&self, id: i64) -> ApiResult<()> {
		self.enter("delete").await?;
		self.state
			.lock()
			.items
			.remove(&id)
			.map(|_| ())
			.ok_or_else(|| Self::not_found(id))
	}

	async fn count(&self) -> ApiResult<u64> {
		self.enter("count").await?;
		Ok(self.state.lock().items.len() as u64)
	}
}
