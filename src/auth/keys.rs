//! Service-provider signing Keys.

// self
use crate::_prelude::*;

/// Decoded key material for one keys version.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
	/// Caller-supplied version identifier; also the cache key.
	pub version: String,
	/// Raw AES secret key bytes.
	pub aes_secret_key: Vec<u8>,
	/// Raw RSA public key bytes (DER or PEM, as published).
	pub rsa_public_key: Vec<u8>,
}
impl Debug for Keys {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Keys")
			.field("version", &self.version)
			.field("aes_secret_key", &"<redacted>")
			.field("rsa_public_key_len", &self.rsa_public_key.len())
			.finish()
	}
}
