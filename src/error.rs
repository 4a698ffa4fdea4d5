//! Client-level error types shared across authentication, throttling, transport, and decoding.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential or token acquisition failure.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Concurrency tag could not be obtained for an update.
	#[error(transparent)]
	ConcurrencyTag(#[from] TagError),
	/// Rate limiter refused to grant budget.
	#[error(transparent)]
	RateLimit(#[from] RateLimitError),
	/// Network-level failure (connection, timeout, cancellation).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Resource path could not be composed.
	#[error(transparent)]
	Path(#[from] PathError),
	/// Persistence-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),

	/// The API answered with a status the operation does not accept.
	#[error("{method} {url} returned {status}: {body}")]
	Status {
		/// HTTP method of the failed request.
		method: &'static str,
		/// Fully-qualified request URL.
		url: String,
		/// HTTP status code.
		status: u16,
		/// Raw response body text.
		body: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode(#[source] serde_json::Error),
}
impl Error {
	/// Returns the HTTP status for [`Error::Status`] values.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns `true` if the error is an application status matching `code`.
	pub fn is_status(&self, code: u16) -> bool {
		self.status() == Some(code)
	}

	/// Returns `true` for network-level failures.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_) | Self::Auth(AuthError::Transport(_)))
	}

	/// Returns `true` for credential and token failures.
	pub fn is_auth(&self) -> bool {
		matches!(self, Self::Auth(_))
	}
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be used as a resource root.
	#[error("Base URL `{url}` cannot carry resource paths.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Authority URL could not be combined with the tenant.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request rate must be positive.
	#[error("Requests per second must be greater than zero.")]
	ZeroRate,
	/// Request timeout must be positive.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
	/// Environment variable held an unusable value.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Human-readable reason.
		reason: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Credential and token acquisition failures. None are retried internally.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// No credentials were supplied or persisted.
	#[error("No credentials are configured.")]
	MissingCredentials,
	/// Credentials failed validation.
	#[error("Credentials are invalid: {reason}.")]
	InvalidCredentials {
		/// Validation failure.
		reason: String,
	},
	/// Token endpoint answered with a non-200 status.
	#[error("Token request failed: {message}.")]
	TokenEndpoint {
		/// Provider- or client-supplied summary.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON or lacked `access_token`.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint returned an empty access token.
	#[error("Server response is missing access_token.")]
	MissingAccessToken,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// The token request never reached a response.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Concurrency-tag failures; each aborts the dependent update.
#[derive(Debug, ThisError)]
pub enum TagError {
	/// Fetching the resource to learn its tag failed.
	#[error("Error fetching concurrency tag for {path}.")]
	Refresh {
		/// Resource path being refreshed.
		path: String,
		/// Underlying failure.
		#[source]
		source: Box<Error>,
	},
	/// The resource body carried no tag field.
	#[error("Concurrency tag is missing from the response body for {path}.")]
	Missing {
		/// Resource path being refreshed.
		path: String,
	},
	/// The tag field was present but not a string.
	#[error("Concurrency tag for {path} must be a string, got {found}.")]
	NotAString {
		/// Resource path being refreshed.
		path: String,
		/// JSON kind that was found instead.
		found: &'static str,
	},
	/// The tag contains bytes that cannot travel in an `If-Match` header.
	#[error("Concurrency tag for {path} is not a valid header value.")]
	InvalidHeader {
		/// Resource path being updated.
		path: String,
	},
}

/// Rate limiter refusals.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum RateLimitError {
	/// The caller cancelled while waiting for budget.
	#[error("Cancelled while waiting for request budget.")]
	Cancelled,
	/// The deadline passed, or would pass before budget becomes available.
	#[error("Deadline exceeded while waiting for request budget.")]
	DeadlineExceeded,
}

/// Transport-level failures (network, timeout, cancellation).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Target URL.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The call did not finish before its deadline.
	#[error("Request to {url} timed out.")]
	Timeout {
		/// Target URL.
		url: String,
	},
	/// The caller cancelled the call.
	#[error("Request to {url} was cancelled.")]
	Cancelled {
		/// Target URL.
		url: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
#[error("Response body from {url} ({status}) is not valid JSON for the expected shape.")]
pub struct DecodeError {
	/// Request URL.
	pub url: String,
	/// HTTP status of the decoded response.
	pub status: u16,
	/// Structured parsing failure with the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

/// Resource path composition failures.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PathError {
	/// The base URL cannot carry path segments.
	#[error("URL `{url}` cannot be used as a resource root.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// An identifier segment was empty.
	#[error("Resource identifier under {parent} cannot be empty.")]
	EmptySegment {
		/// Path the segment would have been appended to.
		parent: String,
	},
	/// An identifier segment contained characters that are not valid in a path segment.
	#[error("Resource identifier `{segment}` contains characters not allowed in a path segment.")]
	InvalidSegment {
		/// Offending segment.
		segment: String,
	},
	/// The composed path did not parse as a URL.
	#[error("Composed resource path `{path}` is not a valid URL.")]
	InvalidUrl {
		/// Composed path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Persistence failures surfaced by [`crate::store`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the file system.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_error_converts_with_source() {
		let store_error = StoreError::Backend { message: "disk unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unreachable"));

		let source = StdError::source(&error)
			.expect("Client error should expose the underlying store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn status_helpers_report_code() {
		let error = Error::Status {
			method: "POST",
			url: "https://graph.example/planner/tasks".into(),
			status: 400,
			body: "{\"error\":\"bad\"}".into(),
		};

		assert_eq!(error.status(), Some(400));
		assert!(error.is_status(400));
		assert!(!error.is_transport());
		assert!(error.to_string().contains("returned 400"));
	}

	#[test]
	fn transport_errors_are_classified() {
		let timeout: Error =
			TransportError::Timeout { url: "https://graph.example/groups".into() }.into();
		let auth_network: Error = AuthError::Transport(TransportError::Cancelled {
			url: "https://login.example/token".into(),
		})
		.into();

		assert!(timeout.is_transport());
		assert!(auth_network.is_transport());
		assert!(auth_network.is_auth());
		assert_eq!(timeout.status(), None);
	}
}
