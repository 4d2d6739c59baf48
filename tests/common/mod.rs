#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use parking_lot::Mutex;
// self
use access_token_agent::{
	agent::{AccessTokenAgent, AgentConfig},
	cache::AgentCache,
	http::{AgentHttpClient, HttpClientError, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient},
	reqwest::Client,
};

pub const CONSUMER_KEY: &str = "consumer-key";
pub const CONSUMER_SECRET: &str = "consumer-secret";

pub type ReqwestTestAgent = AccessTokenAgent<ReqwestHttpClient>;

/// Reqwest transport that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Agent backed by a fresh cache and the reqwest transport used across integration tests.
pub fn build_reqwest_test_agent(config: AgentConfig) -> (ReqwestTestAgent, Arc<AgentCache>) {
	let cache = Arc::new(AgentCache::default());
	let agent =
		AccessTokenAgent::with_http_client(config, cache.clone(), test_reqwest_http_client());

	(agent, cache)
}

#[derive(Debug, thiserror::Error)]
#[error("Scripted transport has no response left.")]
pub struct Exhausted;

/// Transport that records every request and replays scripted responses in order.
#[derive(Default)]
pub struct RecordingClient {
	pub requests: Mutex<Vec<HttpRequest>>,
	responses: Mutex<Vec<HttpResponse>>,
}
impl RecordingClient {
	pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
		let mut responses = responses.into_iter().collect::<Vec<_>>();

		responses.reverse();

		Self { requests: Mutex::default(), responses: Mutex::new(responses) }
	}

	pub fn request_count(&self) -> usize {
		self.requests.lock().len()
	}
}
impl AgentHttpClient for RecordingClient {
	type TransportError = Exhausted;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		self.requests.lock().push(request);

		let next = self.responses.lock().pop();

		Box::pin(async move { next.ok_or_else(|| HttpClientError::Reqwest(Box::new(Exhausted))) })
	}
}

pub fn response(status: u16, body: &str) -> HttpResponse {
	let mut response = HttpResponse::new(body.as_bytes().to_vec());

	*response.status_mut() =
		oauth2::http::StatusCode::from_u16(status).expect("Test status codes should be valid.");

	response
}

pub fn token_body(token: &str, ttl: i64) -> String {
	format!("oauth_token={token}&oauth_token_secret={token}-secret&oauth_expires_in={ttl}")
}
