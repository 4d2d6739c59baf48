//! Optional observability helpers for agent operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `access_token_agent.operation` with the
//!   `operation` and `stage` (call site) fields, plus `debug` events for cache activity.
//! - Enable `metrics` to increment the `access_token_agent_operation_total` counter for every
//!   attempt/cache hit/success/failure, labeled by `operation` + `outcome`, and the
//!   `access_token_agent_cache_total` counter labeled by `namespace` + `event`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations performed by the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentOperation {
	/// Access Token acquisition.
	AccessToken,
	/// Keys retrieval.
	Keys,
}
impl AgentOperation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AgentOperation::AccessToken => "access_token",
			AgentOperation::Keys => "keys",
		}
	}
}
impl Display for AgentOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an agent operation.
	Attempt,
	/// Served from the cache without a network call.
	CacheHit,
	/// Successful completion after a network call.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::CacheHit => "cache_hit",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Cache activity labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheEvent {
	/// Live entry served.
	Hit,
	/// No entry for the key.
	Miss,
	/// Entry found past its expiry and removed.
	Expired,
	/// Entry removed to make room.
	Evicted,
	/// Entry inserted or overwritten.
	Stored,
}
impl CacheEvent {
	/// Returns a stable label suitable for log or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheEvent::Hit => "hit",
			CacheEvent::Miss => "miss",
			CacheEvent::Expired => "expired",
			CacheEvent::Evicted => "evicted",
			CacheEvent::Stored => "stored",
		}
	}
}
impl Display for CacheEvent {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
