//! Cancellation boundary of a page

use super::{PageError, PageResult};
use std::future::Future;
use timetable_types::ApiResult;
use tokio_util::sync::CancellationToken;

/// Cancels all work started by one page controller at once
///
/// Dropping the scope cancels it.
#[derive(Debug, Default)]
pub struct PageScope {
	token: CancellationToken,
}

impl PageScope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Token for work that must stop together with this page
	pub fn token(&self) -> CancellationToken {
		self.token.clone()
	}

	pub fn cancel(&self) {
		self.token.cancel();
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Await `future` unless the scope is cancelled first
	///
	/// # Errors
	///
	/// Returns [`PageError::Cancelled`] when the scope was cancelled before
	/// or while `future` was pending.
	pub async fn run<F>(&self, future: F) -> PageResult<F::Output>
	where
		F: Future,
	{
		tokio::select! {
			biased;
			_ = self.token.cancelled() => Err(PageError::Cancelled),
			output = future => Ok(output),
		}
	}

	/// [`run`](Self::run) for resource calls, flattening the API error
	pub async fn call<T, F>(&self, future: F) -> PageResult<T>
	where
		F: Future<Output = ApiResult<T>>,
	{
		Ok(self.run(future).await??)
	}
}

impl Drop for PageScope {
	fn drop(&mut self) {
		self.token.cancel();
	}
}
