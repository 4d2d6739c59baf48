//! Access Token acquisition.
//!
//! [`AccessTokenAgent::retrieve`] reuses a cached token for the same consumer key and principal
//! when caching is enabled, and otherwise posts a freshly signed form to the Access Token URL.
//! Every request carries its own accessor secret, so two acquisitions never share one.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE, USER_AGENT},
};
// self
use crate::{
	_prelude::*,
	agent::AccessTokenAgent,
	auth::{AccessToken, Secret},
	error::{ConfigError, OAuthError},
	http::{self, AgentHttpClient, HttpRequest, HttpResponse},
	oauth::{self, OAUTH_VERSION},
	obs::{self, AgentOperation, OperationOutcome, OperationSpan},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Parameters for a single Access Token acquisition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessTokenRequest {
	/// Principal the token is requested on behalf of, sent as `xoauth_principal`.
	pub principal: Option<String>,
	/// Skips the cache lookup when true. A fresh token is still stored afterwards.
	pub ignore_cache: bool,
}
impl AccessTokenRequest {
	/// Creates a request for `principal`.
	pub fn with_principal(principal: impl Into<String>) -> Self {
		Self { principal: Some(principal.into()), ignore_cache: false }
	}

	/// Bypasses the cache lookup.
	pub fn ignore_cache(mut self) -> Self {
		self.ignore_cache = true;

		self
	}

	/// Overrides the cache bypass flag.
	pub fn with_ignore_cache(mut self, ignore_cache: bool) -> Self {
		self.ignore_cache = ignore_cache;

		self
	}

	/// Cache key for this request under `consumer_key`.
	pub fn cache_key(&self, consumer_key: &str) -> String {
		format!("{consumer_key}&{}", self.principal.as_deref().unwrap_or_default())
	}

	fn principal(&self) -> Option<&str> {
		self.principal.as_deref().filter(|principal| !principal.is_empty())
	}
}

impl<C> AccessTokenAgent<C>
where
	C: ?Sized + AgentHttpClient,
{
	/// Acquires an Access Token, serving it from the cache when allowed.
	pub async fn retrieve(&self, request: AccessTokenRequest) -> Result<AccessToken> {
		const OPERATION: AgentOperation = AgentOperation::AccessToken;

		let span = OperationSpan::new(OPERATION, "retrieve");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let key = request.cache_key(&self.config.consumer_key);

				if self.config.cache_tokens && !request.ignore_cache {
					if let Some(token) = self.cache.get_token(&key) {
						obs::record_operation_outcome(OPERATION, OperationOutcome::CacheHit);

						return Ok(token);
					}
				}

				let issued_at = now_in_seconds();
				let accessor_secret = oauth::generate_nonce();
				let http_request = self.token_request(
					request.principal(),
					issued_at.unix_timestamp(),
					&accessor_secret,
					&oauth::generate_nonce(),
				)?;
				let response = self
					.http_client
					.execute(http_request)
					.await
					.map_err(http::map_transport_error)?;

				if !response.status().is_success() {
					return Err(self.rejection(OPERATION, &response));
				}

				let token = self.parse_token_response(&response, issued_at, accessor_secret)?;

				if self.config.cache_tokens {
					self.cache.put_token(key, token.clone());
				}

				obs::record_operation_outcome(OPERATION, OperationOutcome::Success);

				Ok(token)
			})
			.await;

		if result.is_err() {
			obs::record_operation_outcome(OPERATION, OperationOutcome::Failure);
		}

		result
	}

	fn token_request(
		&self,
		principal: Option<&str>,
		timestamp: i64,
		accessor_secret: &str,
		nonce: &str,
	) -> Result<HttpRequest> {
		let method = self.config.signature_method;
		let mut params = vec![
			("oauth_consumer_key", self.config.consumer_key.clone()),
			("oauth_signature_method", method.as_str().to_owned()),
			("oauth_version", OAUTH_VERSION.to_owned()),
			("oauth_accessor_secret", accessor_secret.to_owned()),
		];

		if let Some(principal) = principal {
			params.push(("xoauth_principal", principal.to_owned()));
		}

		let base_string = if method.requires_base_string() {
			params.push(("oauth_timestamp", timestamp.to_string()));
			params.push(("oauth_nonce", nonce.to_owned()));

			oauth::build_signature_base_string(
				Method::POST.as_str(),
				&self.config.access_token_url,
				&params,
			)
		} else {
			String::new()
		};
		let signature = oauth::sign(method, self.config.consumer_secret.expose(), "", &base_string);

		params.push(("oauth_signature", signature));

		let request = Request::builder()
			.method(Method::POST)
			.uri(self.config.access_token_url.as_str())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, FORM_CONTENT_TYPE)
			.header(USER_AGENT, self.config.user_agent.as_str())
			.body(oauth::encode_form(&params).into_bytes())
			.map_err(ConfigError::from)?;

		Ok(request)
	}

	fn parse_token_response(
		&self,
		response: &HttpResponse,
		issued_at: OffsetDateTime,
		accessor_secret: String,
	) -> Result<AccessToken> {
		let status = response.status().as_u16();
		let body = oauth::parse_url_query_string(&String::from_utf8_lossy(response.body()));
		let protocol_error = |message: String| -> Error {
			OAuthError::new(message, self.realm.clone()).with_status(status).into()
		};
		let missing =
			|field: &str| protocol_error(format!("Access Token response is missing `{field}`."));
		let token = body.get("oauth_token").ok_or_else(|| missing("oauth_token"))?;
		let token_secret =
			body.get("oauth_token_secret").ok_or_else(|| missing("oauth_token_secret"))?;
		let expires_in = body
			.get("oauth_expires_in")
			.ok_or_else(|| missing("oauth_expires_in"))?
			.trim()
			.parse::<i64>()
			.ok()
			.filter(|ttl| *ttl >= 0)
			.ok_or_else(|| {
				protocol_error(
					"Access Token response carries an invalid `oauth_expires_in`; expected a non-negative integer.".into(),
				)
			})?;
		let expires_at = issued_at.checked_add(Duration::seconds(expires_in)).ok_or_else(|| {
			protocol_error(format!(
				"Access Token response `oauth_expires_in` of {expires_in} seconds is out of range."
			))
		})?;

		Ok(AccessToken {
			accessor_secret: Secret::new(accessor_secret),
			consumer_key: self.config.consumer_key.clone(),
			token: token.clone(),
			token_secret: Secret::new(token_secret.clone()),
			issued_at,
			expires_at,
			signature_method: self.config.signature_method,
			realm: self.realm.clone(),
		})
	}
}

fn now_in_seconds() -> OffsetDateTime {
	let now = OffsetDateTime::now_utc();

	now.replace_nanosecond(0).unwrap_or(now)
}
