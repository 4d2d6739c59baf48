//! Immutable Access Token record and downstream request signing.

// self
use crate::{
	_prelude::*,
	auth::Secret,
	oauth::{self, OAUTH_VERSION, SignatureMethod},
};

/// Access Token issued by the Access Token service.
///
/// Created only by the agent on a successful acquisition and never mutated afterwards; the
/// cache and callers each hold their own clone.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
	/// Client-held secret sent with the token request and bound to the token.
	pub accessor_secret: Secret,
	/// Consumer key the token was issued to.
	pub consumer_key: String,
	/// `oauth_token` value.
	pub token: String,
	/// `oauth_token_secret` value.
	pub token_secret: Secret,
	/// Timestamp of the acquiring request.
	pub issued_at: OffsetDateTime,
	/// `issued_at + oauth_expires_in`.
	pub expires_at: OffsetDateTime,
	/// Method used to sign requests made with this token.
	pub signature_method: SignatureMethod,
	/// Protection domain the token is valid for.
	pub realm: String,
}
impl AccessToken {
	/// Expiry as epoch seconds.
	pub fn expires_at_unix(&self) -> i64 {
		self.expires_at.unix_timestamp()
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Builds a signed `Authorization` header for a downstream request.
	///
	/// `params` are the request's own form or query parameters; they take part in the
	/// HMAC-SHA1 base string but are not copied into the header.
	pub fn authorization_header<K, V>(&self, http_method: &str, url: &Url, params: &[(K, V)]) -> String
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		self.authorization_header_with(
			http_method,
			url,
			params,
			OffsetDateTime::now_utc().unix_timestamp(),
			&oauth::generate_nonce(),
		)
	}

	pub(crate) fn authorization_header_with<K, V>(
		&self,
		http_method: &str,
		url: &Url,
		params: &[(K, V)],
		timestamp: i64,
		nonce: &str,
	) -> String
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut oauth_params = vec![
			("oauth_consumer_key", self.consumer_key.clone()),
			("oauth_token", self.token.clone()),
			("oauth_signature_method", self.signature_method.as_str().to_owned()),
			("oauth_version", OAUTH_VERSION.to_owned()),
		];

		if self.signature_method.requires_base_string() {
			oauth_params.push(("oauth_timestamp", timestamp.to_string()));
			oauth_params.push(("oauth_nonce", nonce.to_owned()));
		}

		let base_string = if self.signature_method.requires_base_string() {
			let all = params
				.iter()
				.map(|(k, v)| (k.as_ref(), v.as_ref()))
				.chain(oauth_params.iter().map(|(k, v)| (*k, v.as_str())))
				.collect::<Vec<_>>();

			oauth::build_signature_base_string(http_method, url, &all)
		} else {
			String::new()
		};
		let signature = oauth::sign(
			self.signature_method,
			self.accessor_secret.expose(),
			self.token_secret.expose(),
			&base_string,
		);

		oauth_params.push(("oauth_signature", signature));

		oauth::build_authorization_header(&self.realm, &oauth_params)
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("accessor_secret", &"<redacted>")
			.field("consumer_key", &self.consumer_key)
			.field("token", &self.token)
			.field("token_secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.field("signature_method", &self.signature_method)
			.field("realm", &self.realm)
			.finish()
	}
}
