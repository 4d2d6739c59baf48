//! Consumer-side OAuth 1.0a agent that acquires Access Tokens and service signing Keys from a
//! remote Access Token service, signs its requests with PLAINTEXT or HMAC-SHA1, and keeps the
//! results in a bounded TTL cache shared across agents.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod agent;
pub mod auth;
pub mod cache;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
