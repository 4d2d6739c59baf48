//! Shared-secret holder for consumer, token, and accessor secrets.

// crates.io
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};
// self
use crate::_prelude::*;

/// Signing secret that never prints, compares in constant time, and is wiped when dropped.
///
/// Every clone owns its own buffer, so the copy held by the cache and the copy handed to a
/// caller are zeroed independently.
#[derive(Clone, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);
impl Secret {
	/// Wraps `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value, for signing only.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `true` for the empty secret, which is the token secret of a token request.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl PartialEq for Secret {
	// Only the length can leak through timing.
	fn eq(&self, other: &Self) -> bool {
		self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
	}
}
impl Eq for Secret {}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Secret(<redacted>)")
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
