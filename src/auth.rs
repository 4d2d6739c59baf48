//! Credential records produced by the agent: Access Tokens, service Keys, and redacted secrets.

pub mod keys;
pub mod secret;
pub mod token;

pub use keys::*;
pub use secret::*;
pub use token::*;
