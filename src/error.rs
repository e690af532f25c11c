//! Executor-level error types shared across flows and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical executor error exposed by public APIs.
///
/// An expired credential is deliberately not represented here: the expiry sentinel arrives
/// inside a well-formed response body and is handled by the retry cycle, so callers observe
/// it through [`ApiResponse::credential_expired`](crate::api::ApiResponse::credential_expired)
/// rather than through `Err`.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request-construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) from the HTTP collaborator.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The token-issuing call itself failed; the previous token is retained.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
}

/// Configuration and request-validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The request's URL template was empty.
	#[error("Request URL template is empty.")]
	EmptyUrl,
	/// The URL did not parse after token substitution.
	#[error("Request URL is invalid after token substitution.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The base service URL cannot carry path segments.
	#[error("Base service URL cannot be a base for endpoint paths.")]
	OpaqueBaseUrl,
	/// Application identifier validation failed.
	#[error(transparent)]
	Identifier(#[from] crate::auth::AppIdError),
}

/// Failures raised while fetching a fresh token from the issuing endpoint.
///
/// A failed refresh never clobbers the stored token; callers keep the previous (possibly
/// stale) value and their next retry cycle triggers another attempt.
#[derive(Debug, ThisError)]
pub enum RefreshError {
	/// The issuing endpoint answered with an error code instead of a token.
	#[error("Token endpoint denied the credential grant: {code} {message}.")]
	Denied {
		/// Remote error code from the response envelope.
		code: i64,
		/// Remote error message, when supplied.
		message: String,
	},
	/// The issuing endpoint answered with a body that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the offending exchange.
		status: u16,
	},
	/// The network call to the issuing endpoint failed outright.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while dispatching the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while dispatching the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
