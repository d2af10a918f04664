//! Error normalisation for HTTP failures

use serde::Deserialize;
use timetable_types::ApiError;

/// Failure to set up the HTTP client itself
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
	#[error("Failed to build HTTP client: {0}")]
	Build(#[from] reqwest::Error),

	#[error("Invalid base URL '{0}'")]
	InvalidBaseUrl(String),
}

/// Error body the backend sends along with a non-success status
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
	#[serde(default)]
	message: Option<String>,
}

/// Extract the backend-supplied message from an error response body
pub(crate) fn backend_message(body: &str) -> Option<String> {
	serde_json::from_str::<BackendErrorBody>(body)
		.ok()
		.and_then(|b| b.message)
		.filter(|m| !m.trim().is_empty())
}

/// Map a non-success response to the user-facing error
pub(crate) fn from_response(
	endpoint: &str,
	operation: &'static str,
	status: reqwest::StatusCode,
	body: &str,
) -> ApiError {
	tracing::error!(
		endpoint,
		operation,
		status = status.as_u16(),
		body,
		"backend returned an error response"
	);
	match backend_message(body) {
		Some(message) => ApiError::backend(message),
		None => ApiError::unknown(),
	}
}

/// Map a failure that produced no usable response
pub(crate) fn from_transport(
	endpoint: &str,
	operation: &'static str,
	error: &reqwest::Error,
) -> ApiError {
	tracing::error!(
		endpoint,
		operation,
		error = %error,
		"request failed without a response"
	);
	if error.is_builder() {
		ApiError::unknown()
	} else {
		ApiError::connection()
	}
}

/// Map a response body that did not decode into the expected shape
pub(crate) fn from_decode(
	endpoint: &str,
	operation: &'static str,
	error: &reqwest::Error,
) -> ApiError {
	tracing::error!(
		endpoint,
		operation,
		error = %error,
		"failed to decode response body"
	);
	ApiError::unknown()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use timetable_types::ApiErrorKind;

	#[rstest]
	#[case(r#"{"message":"Name already taken"}"#, Some("Name already taken"))]
	#[case(r#"{"message":"   "}"#, None)]
	#[case(r#"{"detail":"nope"}"#, None)]
	#[case("<html>502</html>", None)]
	#[case("", None)]
	fn test_backend_message(#[case] body: &str, #[case] expected: Option<&str>) {
		assert_eq!(backend_message(body).as_deref(), expected);
	}

	#[rstest]
	fn test_from_response_prefers_backend_message() {
		let err = from_response(
			"materia",
			"create",
			reqwest::StatusCode::CONFLICT,
			r#"{"message":"Subject exists"}"#,
		);

		assert_eq!(err.kind(), ApiErrorKind::Backend);
		assert_eq!(err.message(), "Subject exists");
	}

	#[rstest]
	fn test_from_response_without_message_is_unknown() {
		let err = from_response(
			"materia",
			"create",
			reqwest::StatusCode::INTERNAL_SERVER_ERROR,
			"oops",
		);

		assert_eq!(err.kind(), ApiErrorKind::Unknown);
	}
}
