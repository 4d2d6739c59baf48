//! OAuth 1.0a protocol codec: percent-encoding, signature base strings, header and form
//! parsing, realm handling, problem codes, and request signatures.

pub mod encoding;
pub mod problem;
pub mod realm;
pub mod signature;

pub use encoding::*;
pub use problem::*;
pub use realm::*;
pub use signature::*;

/// Protocol version sent as `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";
