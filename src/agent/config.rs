//! Construction-time configuration for [`AccessTokenAgent`](crate::agent::AccessTokenAgent).

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::ConfigError,
	http::{DEFAULT_OPEN_TIMEOUT, DEFAULT_READ_TIMEOUT},
	oauth::{RealmAliases, SignatureMethod},
};

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("access-token-agent/", env!("CARGO_PKG_VERSION"));

/// Validated agent configuration.
#[derive(Clone)]
pub struct AgentConfig {
	/// Access Token service endpoint; keys live under `{access_token_url}/keys/{version}`.
	pub access_token_url: Url,
	/// OAuth consumer key.
	pub consumer_key: String,
	/// OAuth consumer secret.
	pub consumer_secret: Secret,
	/// Connect timeout.
	pub open_timeout: StdDuration,
	/// Read timeout.
	pub read_timeout: StdDuration,
	/// Serve and store Access Tokens through the cache.
	pub cache_tokens: bool,
	/// Serve and store Keys through the cache.
	pub cache_keys: bool,
	/// Realms considered equivalent to one another.
	pub realm_aliases: RealmAliases,
	/// Method used to sign token requests and the tokens they yield.
	pub signature_method: SignatureMethod,
	/// `User-Agent` header value.
	pub user_agent: String,
}
impl AgentConfig {
	/// Returns a builder seeded with the required settings.
	pub fn builder(
		access_token_url: impl Into<String>,
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
	) -> AgentConfigBuilder {
		AgentConfigBuilder::new(access_token_url, consumer_key, consumer_secret)
	}
}
impl Debug for AgentConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AgentConfig")
			.field("access_token_url", &self.access_token_url.as_str())
			.field("consumer_key", &self.consumer_key)
			.field("consumer_secret", &"<redacted>")
			.field("open_timeout", &self.open_timeout)
			.field("read_timeout", &self.read_timeout)
			.field("cache_tokens", &self.cache_tokens)
			.field("cache_keys", &self.cache_keys)
			.field("signature_method", &self.signature_method)
			.finish()
	}
}

/// Builder for [`AgentConfig`] values.
#[derive(Debug)]
pub struct AgentConfigBuilder {
	access_token_url: String,
	consumer_key: String,
	consumer_secret: Secret,
	open_timeout: StdDuration,
	read_timeout: StdDuration,
	cache_tokens: bool,
	cache_keys: bool,
	realm_aliases: Option<RealmAliases>,
	signature_method: String,
	user_agent: String,
}
impl AgentConfigBuilder {
	fn new(
		access_token_url: impl Into<String>,
		consumer_key: impl Into<String>,
		consumer_secret: impl Into<String>,
	) -> Self {
		Self {
			access_token_url: access_token_url.into(),
			consumer_key: consumer_key.into(),
			consumer_secret: Secret::new(consumer_secret),
			open_timeout: DEFAULT_OPEN_TIMEOUT,
			read_timeout: DEFAULT_READ_TIMEOUT,
			cache_tokens: true,
			cache_keys: true,
			realm_aliases: None,
			signature_method: SignatureMethod::default().as_str().to_owned(),
			user_agent: DEFAULT_USER_AGENT.to_owned(),
		}
	}

	/// Overrides the connect timeout (defaults to 5 seconds).
	pub fn open_timeout(mut self, timeout: StdDuration) -> Self {
		self.open_timeout = timeout;

		self
	}

	/// Overrides the read timeout (defaults to 5 seconds).
	pub fn read_timeout(mut self, timeout: StdDuration) -> Self {
		self.read_timeout = timeout;

		self
	}

	/// Enables or disables token caching (enabled by default).
	pub fn cache_tokens(mut self, enabled: bool) -> Self {
		self.cache_tokens = enabled;

		self
	}

	/// Enables or disables keys caching (enabled by default).
	pub fn cache_keys(mut self, enabled: bool) -> Self {
		self.cache_keys = enabled;

		self
	}

	/// Replaces the built-in realm alias table.
	pub fn realm_aliases(mut self, aliases: RealmAliases) -> Self {
		self.realm_aliases = Some(aliases);

		self
	}

	/// Selects the signature method by wire name; validated by [`AgentConfigBuilder::build`].
	pub fn signature_method(mut self, method: impl AsRef<str>) -> Self {
		self.signature_method = method.as_ref().to_owned();

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<AgentConfig, ConfigError> {
		let access_token_url = Url::parse(self.access_token_url.trim())
			.map_err(|source| ConfigError::InvalidAccessTokenUrl { source })?;

		if !matches!(access_token_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme {
				scheme: access_token_url.scheme().to_owned(),
			});
		}
		if self.consumer_key.is_empty() {
			return Err(ConfigError::MissingConsumerKey);
		}
		if self.consumer_secret.is_empty() {
			return Err(ConfigError::MissingConsumerSecret);
		}

		let signature_method = self.signature_method.parse::<SignatureMethod>()?;

		Ok(AgentConfig {
			access_token_url,
			consumer_key: self.consumer_key,
			consumer_secret: self.consumer_secret,
			open_timeout: self.open_timeout,
			read_timeout: self.read_timeout,
			cache_tokens: self.cache_tokens,
			cache_keys: self.cache_keys,
			realm_aliases: self.realm_aliases.unwrap_or_else(RealmAliases::builtin),
			signature_method,
			user_agent: self.user_agent,
		})
	}
}
