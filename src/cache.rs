//! Bounded, TTL-based in-memory cache shared by agents.
//!
//! The cache is split into independent namespaces, each capped at a fixed number of entries.
//! When a namespace is full, the entry with the soonest expiration is evicted before the new
//! one is inserted, which bounds staleness instead of optimizing for reuse. A single mutex
//! serializes every read and write so the per-namespace bound holds under concurrent access.
//!
//! Applications normally create one [`AgentCache`] at startup and hand the same `Arc` to every
//! agent that should share tokens and keys.

pub mod entry;

pub use entry::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Keys},
	obs::{self, CacheEvent},
};

/// Namespace holding Access Tokens, keyed by `consumer_key&principal`.
pub const TOKEN_NAMESPACE: &str = "access_tokens";
/// Namespace holding Keys, keyed by version.
pub const KEYS_NAMESPACE: &str = "keys";
/// Entry bound for [`TOKEN_NAMESPACE`].
pub const TOKEN_NAMESPACE_CAPACITY: usize = 5;
/// Entry bound for [`KEYS_NAMESPACE`].
pub const KEYS_NAMESPACE_CAPACITY: usize = 10;
/// Bound applied to namespaces without an explicit capacity.
pub const DEFAULT_NAMESPACE_CAPACITY: usize = 10;

type Namespaces = HashMap<String, HashMap<String, CacheEntry>>;

/// Thread-safe, namespaced store of expiring values.
#[derive(Debug)]
pub struct AgentCache {
	capacities: HashMap<String, usize>,
	namespaces: Mutex<Namespaces>,
}
impl AgentCache {
	/// Creates an empty cache where every namespace holds [`DEFAULT_NAMESPACE_CAPACITY`] entries
	/// unless overridden.
	pub fn empty() -> Self {
		Self { capacities: HashMap::new(), namespaces: Mutex::default() }
	}

	/// Overrides the entry bound for `namespace`.
	pub fn with_namespace_capacity(mut self, namespace: impl Into<String>, capacity: usize) -> Self {
		self.capacities.insert(namespace.into(), capacity);

		self
	}

	/// Entry bound for `namespace`.
	pub fn capacity(&self, namespace: &str) -> usize {
		self.capacities.get(namespace).copied().unwrap_or(DEFAULT_NAMESPACE_CAPACITY)
	}

	/// Returns the live value for `key`, evicting it first if it has expired.
	pub fn get(&self, namespace: &str, key: &str) -> Option<CachedValue> {
		self.get_at(namespace, key, OffsetDateTime::now_utc())
	}

	/// Same as [`AgentCache::get`] with an explicit clock reading.
	pub fn get_at(&self, namespace: &str, key: &str, now: OffsetDateTime) -> Option<CachedValue> {
		let mut guard = self.namespaces.lock();
		let Some(entries) = guard.get_mut(namespace) else {
			obs::record_cache_event(namespace, CacheEvent::Miss);

			return None;
		};

		match entries.get(key) {
			Some(entry) if entry.is_expired_at(now) => {
				entries.remove(key);
				obs::record_cache_event(namespace, CacheEvent::Expired);

				None
			},
			Some(entry) => {
				obs::record_cache_event(namespace, CacheEvent::Hit);

				Some(entry.value.clone())
			},
			None => {
				obs::record_cache_event(namespace, CacheEvent::Miss);

				None
			},
		}
	}

	/// Inserts or overwrites `key`, evicting the soonest-expiring entry when the namespace is
	/// full. Eviction is silent and always succeeds.
	pub fn put(&self, namespace: &str, key: impl Into<String>, entry: CacheEntry) {
		let capacity = self.capacity(namespace);

		if capacity == 0 {
			return;
		}

		let key = key.into();
		let mut guard = self.namespaces.lock();
		let entries = guard.entry(namespace.to_owned()).or_default();

		if !entries.contains_key(&key) {
			while entries.len() >= capacity {
				let Some(victim) = soonest_expiring(entries) else {
					break;
				};

				entries.remove(&victim);
				obs::record_cache_event(namespace, CacheEvent::Evicted);
			}
		}

		entries.insert(key, entry);
		obs::record_cache_event(namespace, CacheEvent::Stored);
	}

	/// Removes `key` from `namespace`, returning its value if present.
	pub fn remove(&self, namespace: &str, key: &str) -> Option<CachedValue> {
		self.namespaces.lock().get_mut(namespace).and_then(|entries| entries.remove(key)).map(|e| e.value)
	}

	/// Number of entries (expired or not) currently held in `namespace`.
	pub fn len(&self, namespace: &str) -> usize {
		self.namespaces.lock().get(namespace).map_or(0, HashMap::len)
	}

	/// `true` when `namespace` holds no entries.
	pub fn is_empty(&self, namespace: &str) -> bool {
		self.len(namespace) == 0
	}

	/// Drops every entry in every namespace.
	pub fn clear(&self) {
		self.namespaces.lock().clear();
	}

	/// Cached Access Token for `key`.
	pub fn get_token(&self, key: &str) -> Option<AccessToken> {
		self.get(TOKEN_NAMESPACE, key).and_then(CachedValue::into_token)
	}

	/// Caches `token` until its own expiry.
	pub fn put_token(&self, key: impl Into<String>, token: AccessToken) {
		self.put(TOKEN_NAMESPACE, key, CacheEntry::token(token));
	}

	/// Cached Keys for `version`.
	pub fn get_keys(&self, version: &str) -> Option<Keys> {
		self.get(KEYS_NAMESPACE, version).and_then(CachedValue::into_keys)
	}

	/// Caches `keys` for [`KEYS_TTL`] from now.
	pub fn put_keys(&self, keys: Keys) {
		let version = keys.version.clone();

		self.put(KEYS_NAMESPACE, version, CacheEntry::keys(keys, OffsetDateTime::now_utc()));
	}
}
impl Default for AgentCache {
	/// Token and keys namespaces bounded at 5 and 10 entries.
	fn default() -> Self {
		Self::empty()
			.with_namespace_capacity(TOKEN_NAMESPACE, TOKEN_NAMESPACE_CAPACITY)
			.with_namespace_capacity(KEYS_NAMESPACE, KEYS_NAMESPACE_CAPACITY)
	}
}

fn soonest_expiring(entries: &HashMap<String, CacheEntry>) -> Option<String> {
	// Entries without an expiry sort after every expiring one.
	entries
		.iter()
		.min_by_key(|(_, entry)| (entry.expires_at.is_none(), entry.expires_at))
		.map(|(key, _)| key.clone())
}
