//! HTTP implementation of [`Resource`]

use crate::error::{self, ClientError};
use crate::resource::Resource;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use timetable_conf::Settings;
use timetable_types::{ApiResult, Entity, ListQuery, Page, TotalCount};

/// Shared HTTP connection pool and backend base URL.
///
/// Cheap to clone; hands out one [`ResourceClient`] per entity type.
#[derive(Debug, Clone)]
pub struct ApiClient {
	http: Client,
	base_url: Arc<str>,
}

impl ApiClient {
	/// Create a client with the default 30 second request timeout.
	///
	/// # Errors
	///
	/// Fails when `base_url` is not an absolute http(s) URL or the TLS
	/// backend cannot be initialised.
	pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
		Self::with_timeout(base_url, Duration::from_secs(30))
	}

	/// Create a client from loaded settings
	///
	/// # Errors
	///
	/// See [`ApiClient::new`].
	pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
		Self::with_timeout(settings.api_url.clone(), settings.request_timeout())
	}

	/// Create a client with an explicit per-request timeout
	///
	/// # Errors
	///
	/// See [`ApiClient::new`].
	pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
		let base_url = base_url.into();
		let parsed =
			url::Url::parse(&base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.clone()))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ClientError::InvalidBaseUrl(base_url));
		}

		let http = Client::builder().timeout(timeout).build()?;
		Ok(Self {
			http,
			base_url: Arc::from(base_url.trim_end_matches('/')),
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Typed client for `T`'s endpoint
	pub fn resource<T: Entity>(&self) -> ResourceClient<T> {
		ResourceClient {
			http: self.http.clone(),
			base_url: Arc::clone(&self.base_url),
			_marker: PhantomData,
		}
	}
}

/// Resource client for one entity type
pub struct ResourceClient<T> {
	http: Client,
	base_url: Arc<str>,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
	fn clone(&self) -> Self {
		Self {
			http: self.http.clone(),
			base_url: Arc::clone(&self.base_url),
			_marker: PhantomData,
		}
	}
}

impl<T: Entity> ResourceClient<T> {
	fn url(&self, suffix: &str) -> String {
		format!("{}/{}{}", self.base_url, T::ENDPOINT, suffix)
	}

	/// Send the request and return the response only when its status is a success
	async fn execute(&self, operation: &'static str, request: RequestBuilder) -> ApiResult<Response> {
		let response = request
			.send()
			.await
			.map_err(|e| error::from_transport(T::ENDPOINT, operation, &e))?;

		let status = response.status();
		tracing::debug!(endpoint = T::ENDPOINT, operation, status = status.as_u16(), "response received");
		if status.is_success() {
			return Ok(response);
		}

		let body = response.text().await.unwrap_or_default();
		Err(error::from_response(T::ENDPOINT, operation, status, &body))
	}

	async fn execute_json<R: DeserializeOwned>(
		&self,
		operation: &'static str,
		request: RequestBuilder,
	) -> ApiResult<R> {
		self.execute(operation, request)
			.await?
			.json::<R>()
			.await
			.map_err(|e| error::from_decode(T::ENDPOINT, operation, &e))
	}
}

#[async_trait]
impl<T: Entity> Resource for ResourceClient<T> {
	type Entity = T;

	async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<T>> {
		let request = self.http.get(self.url("")).query(query);
		self.execute_json("fetch_page", request).await
	}

	async fn fetch_all(&self) -> ApiResult<Vec<T>> {
		let request = self.http.get(self.url("/all"));
		self.execute_json("fetch_all", request).await
	}

	async fn fetch_by_id(&self, id: i64) -> ApiResult<T> {
		let request = self.http.get(self.url(&format!("/{}", id)));
		self.execute_json("fetch_by_id", request).await
	}

	async fn create(&self, entity: &T) -> ApiResult<T> {
		let request = self.http.post(self.url("/")).json(entity);
		self.execute_json("create", request).await
	}

	async fn update(&self, id: i64, entity: &T) -> ApiResult<T> {
		let request = self.http.put(self.url(&format!("/{}", id))).json(entity);
		self.execute_json("update", request).await
	}

	async fn delete(&self, id: i64) -> ApiResult<()> {
		let request = self.http.delete(self.url(&format!("/{}", id)));
		self.execute("delete", request).await.map(|_| ())
	}

	async fn count(&self) -> ApiResult<u64> {
		let request = self.http.get(self.url("/count"));
		let count: TotalCount = self.execute_json("count", request).await?;
		Ok(count.total_count)
	}
}
