//! Keys retrieval.
//!
//! Keys are fetched with a GET to `{access_token_url}/keys/{version}`, signed with an Access
//! Token obtained through [`AccessTokenAgent::retrieve`], and cached per version for
//! [`KEYS_TTL`](crate::cache::KEYS_TTL).

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
// self
use crate::{
	_prelude::*,
	agent::{AccessTokenAgent, AccessTokenRequest},
	auth::{AccessToken, Keys},
	error::{ConfigError, OAuthError},
	http::{self, AgentHttpClient, HttpRequest, HttpResponse},
	obs::{self, AgentOperation, OperationOutcome, OperationSpan},
};

/// Parameters for a single Keys retrieval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeysRequest {
	/// Keys version to fetch; required.
	pub version: String,
	/// Skips the cache lookup when true.
	pub ignore_cache: bool,
}
impl KeysRequest {
	/// Creates a request for `version`.
	pub fn new(version: impl Into<String>) -> Self {
		Self { version: version.into(), ignore_cache: false }
	}

	/// Bypasses the keys cache lookup. The token used to fetch the keys may still be cached.
	pub fn ignore_cache(mut self) -> Self {
		self.ignore_cache = true;

		self
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeysBody {
	aes_key: Option<SecretKeyBody>,
	rsa_key: Option<PublicKeyBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretKeyBody {
	secret_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyBody {
	public_key: Option<String>,
}

impl<C> AccessTokenAgent<C>
where
	C: ?Sized + AgentHttpClient,
{
	/// Fetches the Keys for `request.version`, serving them from the cache when allowed.
	pub async fn retrieve_keys(&self, request: KeysRequest) -> Result<Keys> {
		const OPERATION: AgentOperation = AgentOperation::Keys;

		let span = OperationSpan::new(OPERATION, "retrieve_keys");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				if request.version.is_empty() {
					return Err(ConfigError::MissingKeysVersion.into());
				}
				if self.config.cache_keys && !request.ignore_cache {
					if let Some(keys) = self.cache.get_keys(&request.version) {
						obs::record_operation_outcome(OPERATION, OperationOutcome::CacheHit);

						return Ok(keys);
					}
				}

				let token = self.retrieve(AccessTokenRequest::default()).await?;
				let http_request = self.keys_request(&token, &request.version)?;
				let response = self
					.http_client
					.execute(http_request)
					.await
					.map_err(http::map_transport_error)?;

				if !response.status().is_success() {
					return Err(self.rejection(OPERATION, &response));
				}

				let keys = self.parse_keys_response(&response, request.version)?;

				if self.config.cache_keys {
					self.cache.put_keys(keys.clone());
				}

				obs::record_operation_outcome(OPERATION, OperationOutcome::Success);

				Ok(keys)
			})
			.await;

		if result.is_err() {
			obs::record_operation_outcome(OPERATION, OperationOutcome::Failure);
		}

		result
	}

	/// `{access_token_url}/keys/{version}` with the version as one percent-encoded path segment.
	///
	/// Any query string on the Access Token URL is carried over unchanged.
	pub fn keys_url(&self, version: &str) -> Result<Url> {
		let mut url = self.config.access_token_url.clone();
		let scheme = url.scheme().to_owned();

		url.path_segments_mut()
			.map_err(|_| ConfigError::UnsupportedScheme { scheme })?
			.pop_if_empty()
			.push("keys")
			.push(version);

		Ok(url)
	}

	fn keys_request(&self, token: &AccessToken, version: &str) -> Result<HttpRequest> {
		let url = self.keys_url(version)?;
		let authorization =
			token.authorization_header::<&str, &str>(Method::GET.as_str(), &url, &[]);
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(ACCEPT, "application/json")
			.header(AUTHORIZATION, authorization)
			.header(USER_AGENT, self.config.user_agent.as_str())
			.body(Vec::new())
			.map_err(ConfigError::from)?;

		Ok(request)
	}

	fn parse_keys_response(&self, response: &HttpResponse, version: String) -> Result<Keys> {
		let status = response.status().as_u16();
		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let body: KeysBody = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::KeysResponseParse { source, status: Some(status) })?;
		let protocol_error = |message: String| -> Error {
			OAuthError::new(message, self.realm.clone()).with_status(status).into()
		};
		let aes = body
			.aes_key
			.and_then(|key| key.secret_key)
			.ok_or_else(|| protocol_error("Keys response is missing `aesKey.secretKey`.".into()))?;
		let rsa = body
			.rsa_key
			.and_then(|key| key.public_key)
			.ok_or_else(|| protocol_error("Keys response is missing `rsaKey.publicKey`.".into()))?;
		let aes_secret_key = STANDARD.decode(aes.trim()).map_err(|e| {
			protocol_error(format!("Keys response `aesKey.secretKey` is not valid Base64: {e}."))
		})?;
		let rsa_public_key = STANDARD.decode(rsa.trim()).map_err(|e| {
			protocol_error(format!("Keys response `rsaKey.publicKey` is not valid Base64: {e}."))
		})?;

		Ok(Keys { version, aes_secret_key, rsa_public_key })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		agent::AgentConfig,
		cache::AgentCache,
		http::{HttpClientError, HttpFuture},
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

	fn agent(url: &str) -> AccessTokenAgent<NoopClient> {
		let config = AgentConfig::builder(url, "ck", "cs")
			.build()
			.expect("Test configuration should be valid.");

		AccessTokenAgent::with_http_client(config, Arc::new(AgentCache::default()), NoopClient)
	}

	fn response(body: &str) -> HttpResponse {
		HttpResponse::new(body.as_bytes().to_vec())
	}

	#[test]
	fn keys_url_appends_encoded_version() {
		let agent = agent("https://ats.example.com/oauth/");

		assert_eq!(
			agent.keys_url("v 1").expect("Keys URL should build.").as_str(),
			"https://ats.example.com/oauth/keys/v%201"
		);
	}

	#[test]
	fn keys_url_keeps_the_access_token_query() {
		let agent = agent("https://ats.example.com/token?tenant=a");
		let url = agent.keys_url("v1").expect("Keys URL should build.");

		assert_eq!(url.path(), "/token/keys/v1");
		assert_eq!(url.query(), Some("tenant=a"));
		assert_eq!(url.as_str(), "https://ats.example.com/token/keys/v1?tenant=a");
	}

	#[test]
	fn keys_body_decodes_base64_material() {
		let agent = agent("https://ats.example.com/oauth");
		let keys = agent
			.parse_keys_response(
				&response(
					r#"{"aesKey":{"secretKey":"YWVzLXNlY3JldC1rZXktbWF0ZXJpYWw="},"rsaKey":{"publicKey":"cnNhLXB1YmxpYy1rZXktZGVy"}}"#,
				),
				"v1".into(),
			)
			.expect("Complete keys bodies should parse.");

		assert_eq!(keys.version, "v1");
		assert_eq!(keys.aes_secret_key, b"aes-secret-key-material");
		assert_eq!(keys.rsa_public_key, b"rsa-public-key-der");
	}

	#[test]
	fn absent_or_undecodable_material_is_a_protocol_error() {
		let agent = agent("https://ats.example.com/oauth");
		let err = agent
			.parse_keys_response(&response(r#"{"aesKey":{"secretKey":"YQ=="}}"#), "v1".into())
			.expect_err("Missing RSA key should fail.");

		assert!(matches!(err, Error::OAuth(ref e) if e.message.contains("rsaKey.publicKey")));

		let err = agent
			.parse_keys_response(
				&response(r#"{"aesKey":{"secretKey":"***"},"rsaKey":{"publicKey":"YQ=="}}"#),
				"v1".into(),
			)
			.expect_err("Invalid Base64 should fail.");

		assert!(matches!(err, Error::OAuth(ref e) if e.status == Some(200)));
	}

	#[test]
	fn malformed_json_is_reported_with_its_path() {
		let agent = agent("https://ats.example.com/oauth");
		let err = agent
			.parse_keys_response(&response(r#"{"aesKey":{"secretKey":42}}"#), "v1".into())
			.expect_err("Wrongly typed fields should fail.");
		let Error::KeysResponseParse { source, status } = err else {
			panic!("Malformed JSON should surface as a parse error.");
		};

		assert_eq!(status, Some(200));
		assert_eq!(source.path().to_string(), "aesKey.secretKey");
	}

	#[tokio::test]
	async fn empty_version_fails_before_the_network() {
		let agent = agent("https://ats.example.com/oauth");
		let err =
			agent.retrieve_keys(KeysRequest::new("")).await.expect_err("Version is required.");

		assert!(matches!(err, Error::Config(ConfigError::MissingKeysVersion)));
	}

	#[tokio::test]
	async fn cached_keys_skip_the_network() {
		let agent = agent("https://ats.example.com/oauth");

		agent.cache.put_keys(Keys {
			version: "v1".into(),
			aes_secret_key: vec![1],
			rsa_public_key: vec![2],
		});

		let keys = agent.retrieve_keys(KeysRequest::new("v1")).await.expect("Cache should serve.");

		assert_eq!(keys.aes_secret_key, vec![1]);

		let err = agent
			.retrieve_keys(KeysRequest::new("v1").ignore_cache())
			.await
			.expect_err("Bypassing the cache hits the unreachable transport.");

		assert!(matches!(err, Error::Transport(_)));
	}
}
