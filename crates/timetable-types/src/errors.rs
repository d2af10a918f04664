//! Error types shared across the workspace

use thiserror::Error;

/// Message shown when the backend could not be reached at all
pub const CONNECTION_ERROR_MESSAGE: &str =
	"Unable to connect to the server. Check your connection or try again later.";

/// Message shown when a failure carries no usable explanation
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Category of a normalised API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
	/// The backend answered and supplied its own message
	Backend,
	/// No response was received
	Connection,
	/// Anything else
	Unknown,
}

/// A resource-client failure reduced to its user-facing message.
///
/// Page controllers only ever see this shape; transport details are logged
/// where the failure happens and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
	kind: ApiErrorKind,
	message: String,
}

impl ApiError {
	/// Backend-reported failure, message passed through verbatim
	pub fn backend(message: impl Into<String>) -> Self {
		Self {
			kind: ApiErrorKind::Backend,
			message: message.into(),
		}
	}

	/// Transport-level failure with the fixed connection message
	pub fn connection() -> Self {
		Self {
			kind: ApiErrorKind::Connection,
			message: CONNECTION_ERROR_MESSAGE.to_string(),
		}
	}

	/// Failure with the fixed generic message
	pub fn unknown() -> Self {
		Self {
			kind: ApiErrorKind::Unknown,
			message: UNKNOWN_ERROR_MESSAGE.to_string(),
		}
	}

	pub fn kind(&self) -> ApiErrorKind {
		self.kind
	}

	/// The text to show the user
	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Result type for resource-client operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Local validation failure, raised before any request is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A required field is missing or blank
	#[error("Field '{0}' is required")]
	Required(String),

	/// A field has a value of the wrong shape
	#[error("Invalid value for '{field}': {reason}")]
	Invalid { field: String, reason: String },
}

impl ValidationError {
	pub fn required(field: impl Into<String>) -> Self {
		Self::Required(field.into())
	}

	pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Invalid {
			field: field.into(),
			reason: reason.into(),
		}
	}

	/// Name of the offending field
	pub fn field(&self) -> &str {
		match self {
			Self::Required(field) => field,
			Self::Invalid { field, .. } => field,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_backend_error_keeps_message_verbatim() {
		// Arrange
		let err = ApiError::backend("Professor already exists");

		// Act
		let shown = err.to_string();

		// Assert
		assert_eq!(shown, "Professor already exists");
		assert_eq!(err.kind(), ApiErrorKind::Backend);
	}

	#[rstest]
	#[case(ApiError::connection(), ApiErrorKind::Connection, CONNECTION_ERROR_MESSAGE)]
	#[case(ApiError::unknown(), ApiErrorKind::Unknown, UNKNOWN_ERROR_MESSAGE)]
	fn test_fixed_messages(
		#[case] err: ApiError,
		#[case] kind: ApiErrorKind,
		#[case] message: &str,
	) {
		assert_eq!(err.kind(), kind);
		assert_eq!(err.message(), message);
	}

	#[rstest]
	fn test_validation_error_field() {
		assert_eq!(ValidationError::required("nome").field(), "nome");
		assert_eq!(ValidationError::invalid("hora", "bad").field(), "hora");
	}
}
