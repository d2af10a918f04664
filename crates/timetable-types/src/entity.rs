//! Entity capability

use crate::errors::ValidationError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A backend-managed resource reachable through the uniform REST contract.
///
/// `ENDPOINT` is the path segment appended to the API base URL, and doubles
/// as the front-end route prefix for the entity's list/create/edit/view pages.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
	/// Path segment for this resource, without slashes
	const ENDPOINT: &'static str;

	/// The identifier, absent until the backend has persisted the entity
	fn id(&self) -> Option<i64>;

	/// Assign the identifier the backend allocated
	fn set_id(&mut self, id: i64);

	/// Local validation run before any create/update request.
	///
	/// # Errors
	///
	/// Returns a [`ValidationError`] describing the first offending field.
	fn validate(&self) -> Result<(), ValidationError> {
		Ok(())
	}
}
