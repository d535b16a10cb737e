//! Crate-level error types shared by token sources, wire parsing, and request signing.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed, thread-safe error used for opaque upstream failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Caching sources never construct these themselves; whatever the underlying source returns is
/// handed back to the caller untouched.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Opaque failure reported by an issuance collaborator.
	#[error("Token issuance failed.")]
	Issuance {
		/// Collaborator-specific failure.
		#[source]
		source: BoxError,
	},
	/// Authorization server rejected the token request.
	#[error("Token endpoint rejected the request: {}.", .code.as_deref().unwrap_or("unknown error"))]
	Retrieve {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// OAuth 2.0 `error` code, when the server supplied one.
		code: Option<String>,
		/// OAuth 2.0 `error_description`, when the server supplied one.
		description: Option<String>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON at `{}`.", .source.path())]
	TokenResponseParse {
		/// Structured parsing failure including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint response carried no access token.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
}
impl Error {
	/// Wraps a collaborator-specific failure inside [`Error::Issuance`].
	pub fn issuance(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Issuance { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		TransportError::from(e).into()
	}
}
