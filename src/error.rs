//! Agent-level error types shared across the codec, transport, cache, and orchestration layers.

// self
use crate::{_prelude::*, oauth::OAuthProblem};

/// Agent-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical agent error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; never reaches the network.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeouts).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The Access Token service rejected the request or answered without required fields.
	#[error(transparent)]
	OAuth(#[from] OAuthError),
	/// Keys endpoint responded with JSON that could not be parsed.
	#[error("Keys endpoint returned malformed JSON.")]
	KeysResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl Error {
	/// Returns the OAuth problem code carried by a protocol error, if any.
	pub fn problem(&self) -> Option<&OAuthProblem> {
		match self {
			Self::OAuth(err) => err.problem.as_ref(),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while constructing the agent or a request.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Access Token URL cannot be parsed.
	#[error("Access Token URL is invalid.")]
	InvalidAccessTokenUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Access Token URL is not an HTTP or HTTPS URL.
	#[error("Access Token URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Scheme that failed validation.
		scheme: String,
	},
	/// Consumer key was empty.
	#[error("Consumer key is required.")]
	MissingConsumerKey,
	/// Consumer secret was empty.
	#[error("Consumer secret is required.")]
	MissingConsumerSecret,
	/// Requested signature method is outside the supported set.
	#[error("Signature method `{method}` is not supported; use PLAINTEXT or HMAC-SHA1.")]
	UnsupportedSignatureMethod {
		/// Method name that was requested.
		method: String,
	},
	/// Keys were requested without a version.
	#[error("Keys version is required.")]
	MissingKeysVersion,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Access Token service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Access Token service.")]
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

/// Failure reported by the Access Token service, or a successful response missing required
/// material.
///
/// Callers branch on [`OAuthError::problem`] to tell, for example, an expired token from a
/// rejected signature.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct OAuthError {
	/// Human-readable summary.
	pub message: String,
	/// HTTP status code, when the failure came from a response.
	pub status: Option<u16>,
	/// OAuth problem code from the `oauth_problem` parameter.
	pub problem: Option<OAuthProblem>,
	/// Companion value for the problem code (acceptable versions, absent parameters, advice).
	pub additional_info: Option<String>,
	/// Realm in which the failure occurred.
	pub realm: String,
}
impl OAuthError {
	/// Creates an error without HTTP or problem details.
	pub fn new(message: impl Into<String>, realm: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			status: None,
			problem: None,
			additional_info: None,
			realm: realm.into(),
		}
	}

	/// Attaches the HTTP status code.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);

		self
	}

	/// Attaches the OAuth problem code.
	pub fn with_problem(mut self, problem: OAuthProblem) -> Self {
		self.problem = Some(problem);

		self
	}

	/// Attaches the problem's companion value.
	pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
		self.additional_info = Some(info.into());

		self
	}
}
