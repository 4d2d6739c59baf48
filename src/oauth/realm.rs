//! Realm derivation and alias equivalence.

// std
use std::sync::LazyLock;
// self
use crate::_prelude::*;

static DEFAULT_ALIASES: LazyLock<RealmAliases> = LazyLock::new(|| {
	RealmAliases::from_groups([
		["https://ats.example.com", "https://ats-internal.example.com"].as_slice(),
		["https://ats.sandbox.example.com", "https://ats-internal.sandbox.example.com"].as_slice(),
		["https://ats.dev.example.com", "https://ats-internal.dev.example.com", "http://localhost:8080"]
			.as_slice(),
	])
});

/// Returns `scheme://host[:port]`, with the port present only when it is not the scheme default.
pub fn realm_for(url: &Url) -> String {
	let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

	match url.port() {
		Some(port) => format!("{}://{host}:{port}", url.scheme()),
		None => format!("{}://{host}", url.scheme()),
	}
}

/// Immutable table of realms treated as equivalent to each other.
///
/// Lookups are symmetric: if `a` lists `b` as an alias, `b` is also equivalent to `a`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RealmAliases(BTreeMap<String, Vec<String>>);
impl RealmAliases {
	/// Built-in production, sandbox, and development sibling realms.
	pub fn builtin() -> Self {
		DEFAULT_ALIASES.clone()
	}

	/// Builds a table in which every realm of a group aliases every other realm of that group.
	pub fn from_groups<G, R>(groups: impl IntoIterator<Item = G>) -> Self
	where
		G: IntoIterator<Item = R>,
		R: AsRef<str>,
	{
		let mut table = BTreeMap::<String, Vec<String>>::new();

		for group in groups {
			let members = group.into_iter().map(|r| r.as_ref().to_owned()).collect::<Vec<_>>();

			for member in &members {
				let entry = table.entry(member.clone()).or_default();

				for other in members.iter().filter(|other| *other != member) {
					if !entry.contains(other) {
						entry.push(other.clone());
					}
				}
			}
		}

		Self(table)
	}

	/// Adds a one-way alias; lookups still treat it symmetrically.
	pub fn with_alias(mut self, realm: impl Into<String>, alias: impl Into<String>) -> Self {
		let entry = self.0.entry(realm.into()).or_default();
		let alias = alias.into();

		if !entry.contains(&alias) {
			entry.push(alias);
		}

		self
	}

	/// Aliases configured for `realm`.
	pub fn aliases(&self, realm: &str) -> &[String] {
		self.0.get(realm).map(Vec::as_slice).unwrap_or_default()
	}

	/// `true` when `a` and `b` are the same realm or either lists the other as an alias.
	pub fn realm_eql(&self, a: &str, b: &str) -> bool {
		a == b || self.aliases(a).iter().any(|r| r == b) || self.aliases(b).iter().any(|r| r == a)
	}

	/// `true` when no aliases are configured.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
