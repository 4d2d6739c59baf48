//! Access Token agent: ties request construction, signing, response interpretation, and caching
//! into single retrieval operations.
//!
//! Each call walks one linear pipeline: check the cache, build and sign the request, send it,
//! then either parse the success body and populate the cache or turn the failure into an
//! [`OAuthError`]. The agent never retries and never de-duplicates concurrent misses for the
//! same key; both are caller concerns.

pub mod config;

mod access_token;
mod keys;

pub use access_token::*;
pub use config::*;
pub use keys::*;

// crates.io
use oauth2::http::{HeaderValue, header::WWW_AUTHENTICATE};
// self
use crate::{
	_prelude::*,
	cache::AgentCache,
	error::OAuthError,
	http::{AgentHttpClient, HttpResponse},
	oauth::{self, OAuthProblem},
	obs::{self, AgentOperation},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Agent specialized for the crate's default reqwest transport.
pub type ReqwestAgent = AccessTokenAgent<ReqwestHttpClient>;

/// Acquires Access Tokens and Keys from a single Access Token service.
///
/// The agent is `Send + Sync` and safe to share between tasks. Its cache is injected so several
/// agents can share one process-wide instance.
#[derive(Clone)]
pub struct AccessTokenAgent<C>
where
	C: ?Sized + AgentHttpClient,
{
	/// Validated configuration.
	pub config: AgentConfig,
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Cache shared with other agents.
	pub cache: Arc<AgentCache>,
	realm: String,
}
impl<C> AccessTokenAgent<C>
where
	C: ?Sized + AgentHttpClient,
{
	/// Creates an agent that reuses the caller-provided transport.
	pub fn with_http_client(
		config: AgentConfig,
		cache: Arc<AgentCache>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let realm = oauth::realm_for(&config.access_token_url);

		Self { config, http_client: http_client.into(), cache, realm }
	}

	/// Protection domain of the Access Token URL.
	pub fn realm(&self) -> &str {
		&self.realm
	}

	/// `true` when `other` is this agent's realm or one of its configured aliases.
	pub fn realm_eql(&self, other: &str) -> bool {
		self.config.realm_aliases.realm_eql(&self.realm, other)
	}

	/// `true` when an `Authorization` header names a realm equivalent to this agent's realm.
	pub fn accepts_authorization_realm(&self, header_value: &str) -> bool {
		oauth::parse_authorization_header(Some(header_value))
			.get("realm")
			.is_some_and(|realm| self.realm_eql(realm))
	}

	/// Turns a non-2xx response into an [`OAuthError`] using its `WWW-Authenticate` header.
	fn rejection(&self, operation: AgentOperation, response: &HttpResponse) -> Error {
		let status = response.status().as_u16();
		let params = oauth::parse_authorization_header(
			response.headers().get(WWW_AUTHENTICATE).and_then(|value| HeaderValue::to_str(value).ok()),
		);
		let realm = params.get("realm").cloned().unwrap_or_else(|| self.realm.clone());
		let problem = params.get("oauth_problem").map(|code| OAuthProblem::from_code(code));

		obs::warn_protocol_failure(operation, status, problem.as_ref().map(OAuthProblem::as_str));

		let message = match &problem {
			Some(problem) => format!(
				"Access Token service rejected the {operation} request with HTTP {status}: {problem}."
			),
			None => format!("Access Token service rejected the {operation} request with HTTP {status}."),
		};
		let mut err = OAuthError::new(message, realm).with_status(status);

		if let Some(problem) = problem {
			if let Some(info) = params.get(problem.additional_info_parameter()) {
				err = err.with_additional_info(info.clone());
			}

			err = err.with_problem(problem);
		}

		err.into()
	}
}
#[cfg(feature = "reqwest")]
impl AccessTokenAgent<ReqwestHttpClient> {
	/// Creates an agent that provisions its own reqwest transport from the configured timeouts.
	pub fn new(config: AgentConfig, cache: Arc<AgentCache>) -> Result<Self> {
		let http_client = ReqwestHttpClient::new(config.open_timeout, config.read_timeout)?;

		Ok(Self::with_http_client(config, cache, http_client))
	}
}
impl<C> Debug for AccessTokenAgent<C>
where
	C: ?Sized + AgentHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenAgent")
			.field("config", &self.config)
			.field("realm", &self.realm)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		http::{HttpClientError, HttpFuture, HttpRequest},
		oauth::RealmAliases,
	};

	#[derive(Debug, ThisError)]
	#[error("Unreachable transport.")]
	struct Unreachable;

	struct NoopClient;
	impl AgentHttpClient for NoopClient {
		type TransportError = Unreachable;

		fn execute(&self, _request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
			Box::pin(async { Err::<HttpResponse, _>(HttpClientError::Reqwest(Box::new(Unreachable))) })
		}
	}

	fn agent(aliases: RealmAliases) -> AccessTokenAgent<NoopClient> {
		let config = AgentConfig::builder("https://ats.example.com:8443/token", "key", "secret")
			.realm_aliases(aliases)
			.build()
			.expect("Test configuration should be valid.");

		AccessTokenAgent::with_http_client(config, Arc::new(AgentCache::default()), NoopClient)
	}

	#[test]
	fn realm_comes_from_access_token_url() {
		let agent = agent(RealmAliases::default());

		assert_eq!(agent.realm(), "https://ats.example.com:8443");
		assert!(agent.realm_eql("https://ats.example.com:8443"));
		assert!(!agent.realm_eql("https://ats.example.com"));
	}

	#[test]
	fn aliases_extend_accepted_realms() {
		let agent = agent(
			RealmAliases::default().with_alias("https://ats.example.com:8443", "https://ats.example.org"),
		);

		assert!(agent.realm_eql("https://ats.example.org"));
		assert!(agent.accepts_authorization_realm("OAuth realm=\"https://ats.example.org\", oauth_token=\"t\""));
		assert!(!agent.accepts_authorization_realm("OAuth oauth_token=\"t\""));
	}

	#[test]
	fn rejection_reads_problem_and_companion_parameter() {
		let agent = agent(RealmAliases::default());
		let mut response = HttpResponse::new(Vec::new());

		*response.status_mut() = oauth2::http::StatusCode::BAD_REQUEST;
		response.headers_mut().insert(
			WWW_AUTHENTICATE,
			HeaderValue::from_static(
				"OAuth realm=\"R\", oauth_problem=\"parameter_absent\", oauth_parameters_absent=\"oauth_nonce\"",
			),
		);

		let Error::OAuth(err) = agent.rejection(AgentOperation::AccessToken, &response) else {
			panic!("Rejections should surface as OAuth errors.");
		};

		assert_eq!(err.status, Some(400));
		assert_eq!(err.problem, Some(OAuthProblem::ParameterAbsent));
		assert_eq!(err.additional_info.as_deref(), Some("oauth_nonce"));
		assert_eq!(err.realm, "R");
	}

	#[test]
	fn rejection_without_header_uses_agent_realm() {
		let agent = agent(RealmAliases::default());
		let mut response = HttpResponse::new(Vec::new());

		*response.status_mut() = oauth2::http::StatusCode::INTERNAL_SERVER_ERROR;

		let Error::OAuth(err) = agent.rejection(AgentOperation::Keys, &response) else {
			panic!("Rejections should surface as OAuth errors.");
		};

		assert_eq!(err.status, Some(500));
		assert!(err.problem.is_none());
		assert_eq!(err.realm, "https://ats.example.com:8443");
	}
}
