//! Transport primitives for Access Token service calls.
//!
//! The agent depends on a single capability: submit an [`HttpRequest`] and receive an
//! [`HttpResponse`]. [`AgentHttpClient`] captures it so tests and downstream crates can plug in
//! their own transport, while [`ReqwestHttpClient`] provides the default one with the
//! connection timeouts and TLS policy the service requires.

// crates.io
pub use oauth2::{HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Default connect timeout.
pub const DEFAULT_OPEN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
/// Default read timeout.
pub const DEFAULT_READ_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Boxed future returned by [`AgentHttpClient::execute`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of reaching the Access Token service.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by agents
/// running on any executor. Non-2xx responses are returned as responses, not errors; only
/// connection, TLS, and timeout failures map to [`HttpClientError`].
pub trait AgentHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves with the full response.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Converts a transport failure into an agent [`Error`]; no retry is attempted.
pub fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::Io(std::io::Error::other(message)).into(),
		other => TransportError::Io(std::io::Error::other(other.to_string())).into(),
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are never followed: the Access Token service answers directly. TLS goes through
/// rustls with certificate and hostname verification, TLS 1.2 or newer, and a cipher suite
/// list that contains no null, export, RC4, or SSLv2 suites.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client with the provided connect (open) and read timeouts.
	pub fn new(
		open_timeout: std::time::Duration,
		read_timeout: std::time::Duration,
	) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.connect_timeout(open_timeout)
			.read_timeout(read_timeout)
			.redirect(reqwest::redirect::Policy::none())
			.min_tls_version(reqwest::tls::Version::TLS_1_2)
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AgentHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
