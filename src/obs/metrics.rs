// self
use crate::obs::{AgentOperation, CacheEvent, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(operation: AgentOperation, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"access_token_agent_operation_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Records cache activity via the global metrics recorder and a `debug` event (when enabled).
pub fn record_cache_event(namespace: &str, event: CacheEvent) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"access_token_agent_cache_total",
			"namespace" => namespace.to_owned(),
			"event" => event.as_str()
		)
		.increment(1);
	}
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(namespace, event = event.as_str(), "cache activity");
	}

	#[cfg(not(any(feature = "metrics", feature = "tracing")))]
	{
		let _ = (namespace, event);
	}
}
