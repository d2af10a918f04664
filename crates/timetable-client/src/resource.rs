//! The resource capability

use async_trait::async_trait;
use std::sync::Arc;
use timetable_types::{ApiResult, Entity, ListQuery, Page};

/// CRUD access to one backend resource.
///
/// Implementations normalise every failure into an
/// [`ApiError`](timetable_types::ApiError) before returning it.
#[async_trait]
pub trait Resource: Send + Sync {
	/// The entity this resource serves
	type Entity: Entity;

	/// Path segment of the resource, also used as the front-end route prefix
	fn endpoint(&self) -> &str {
		<Self::Entity as Entity>::ENDPOINT
	}

	/// `GET {entity}?page_number&page_size&filter`
	async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<Self::Entity>>;

	/// `GET {entity}/all`
	async fn fetch_all(&self) -> ApiResult<Vec<Self::Entity>>;

	/// `GET {entity}/{id}`
	async fn fetch_by_id(&self, id: i64) -> ApiResult<Self::Entity>;

	/// `POST {entity}/`
	async fn create(&self, entity: &Self::Entity) -> ApiResult<Self::Entity>;

	/// `PUT {entity}/{id}`
	async fn update(&self, id: i64, entity: &Self::Entity) -> ApiResult<Self::Entity>;

	/// `DELETE {entity}/{id}`
	async fn delete(&self, id: i64) -> ApiResult<()>;

	/// `GET {entity}/count`, unwrapped to the plain number
	async fn count(&self) -> ApiResult<u64>;
}

/// Shared, type-erased resource as held by page controllers
pub type DynResource<T> = Arc<dyn Resource<Entity = T>>;
