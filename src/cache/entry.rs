//! Cache entries and the values they wrap.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Keys},
};

/// Fixed lifetime of a Keys entry, independent of anything the service reports.
pub const KEYS_TTL: Duration = Duration::hours(24);

/// Value stored in an [`AgentCache`](crate::cache::AgentCache) namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CachedValue {
	/// Access Token entry.
	Token(AccessToken),
	/// Keys entry.
	Keys(Keys),
}
impl CachedValue {
	/// Returns the token, if this is a token entry.
	pub fn into_token(self) -> Option<AccessToken> {
		match self {
			Self::Token(token) => Some(token),
			Self::Keys(_) => None,
		}
	}

	/// Returns the keys, if this is a keys entry.
	pub fn into_keys(self) -> Option<Keys> {
		match self {
			Self::Keys(keys) => Some(keys),
			Self::Token(_) => None,
		}
	}
}

/// A cached value plus the instant it stops being served. `None` never expires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
	/// Wrapped value.
	pub value: CachedValue,
	/// Expiration instant.
	pub expires_at: Option<OffsetDateTime>,
}
impl CacheEntry {
	/// Wraps `value` with an explicit expiration.
	pub fn new(value: CachedValue, expires_at: Option<OffsetDateTime>) -> Self {
		Self { value, expires_at }
	}

	/// Token entry expiring with the token itself.
	pub fn token(token: AccessToken) -> Self {
		let expires_at = token.expires_at;

		Self::new(CachedValue::Token(token), Some(expires_at))
	}

	/// Keys entry expiring [`KEYS_TTL`] after `inserted_at`.
	pub fn keys(keys: Keys, inserted_at: OffsetDateTime) -> Self {
		Self::new(CachedValue::Keys(keys), Some(inserted_at + KEYS_TTL))
	}

	/// `true` once `now` reaches the expiration instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| now >= expires_at)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn keys_entries_live_for_a_day() {
		let inserted = macros::datetime!(2030-01-01 00:00 UTC);
		let entry = CacheEntry::keys(
			Keys { version: "1".into(), aes_secret_key: vec![], rsa_public_key: vec![] },
			inserted,
		);

		assert_eq!(entry.expires_at, Some(macros::datetime!(2030-01-02 00:00 UTC)));
		assert!(!entry.is_expired_at(macros::datetime!(2030-01-01 23:59 UTC)));
		assert!(entry.is_expired_at(macros::datetime!(2030-01-02 00:00 UTC)));
	}
}
