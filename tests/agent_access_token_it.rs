mod common;

// crates.io
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use access_token_agent::{
	agent::{AccessTokenRequest, AgentConfig},
	error::Error,
	oauth::OAuthProblem,
};
use common::*;

fn config(server: &MockServer) -> AgentConfig {
	AgentConfig::builder(server.url("/oauth/access_token"), CONSUMER_KEY, CONSUMER_SECRET)
		.build()
		.expect("Agent configuration should be valid for token tests.")
}

#[tokio::test]
async fn plaintext_token_expires_after_reported_ttl() {
	let server = MockServer::start_async().await;
	let (agent, _cache) = build_reqwest_test_agent(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/access_token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=T&oauth_token_secret=S&oauth_expires_in=3600");
		})
		.await;
	let before = OffsetDateTime::now_utc() - Duration::seconds(1);
	let token = agent
		.retrieve(AccessTokenRequest::default())
		.await
		.expect("Token acquisition should succeed.");

	mock.assert_async().await;

	assert_eq!(token.token, "T");
	assert_eq!(token.token_secret.expose(), "S");
	assert_eq!(token.consumer_key, CONSUMER_KEY);
	assert_eq!(token.expires_at, token.issued_at + Duration::seconds(3600));
	assert!(token.issued_at >= before);
	assert_eq!(token.realm, agent.realm());
	assert!(!token.is_expired());
}

#[tokio::test]
async fn rejected_token_request_carries_problem_and_realm() {
	let server = MockServer::start_async().await;
	let (agent, cache) = build_reqwest_test_agent(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(401)
				.header("www-authenticate", "OAuth realm=\"R\", oauth_problem=\"token_rejected\"");
		})
		.await;
	let err = agent
		.retrieve(AccessTokenRequest::default())
		.await
		.expect_err("401 responses should fail.");

	mock.assert_async().await;

	assert_eq!(err.problem(), Some(&OAuthProblem::TokenRejected));

	let Error::OAuth(err) = err else {
		panic!("Rejected requests should surface as OAuth errors.");
	};

	assert_eq!(err.status, Some(401));
	assert_eq!(err.realm, "R");
	assert!(cache.is_empty(access_token_agent::cache::TOKEN_NAMESPACE));
}

#[tokio::test]
async fn cached_token_is_reused_without_a_second_call() {
	let server = MockServer::start_async().await;
	let (agent, _cache) = build_reqwest_test_agent(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200).body(token_body("cached", 3600));
		})
		.await;
	let first = agent
		.retrieve(AccessTokenRequest::default())
		.await
		.expect("Initial token acquisition should succeed.");
	let second = agent
		.retrieve(AccessTokenRequest::default())
		.await
		.expect("Cached token acquisition should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(first, second);
}

#[tokio::test]
async fn ignore_cache_forces_a_network_call() {
	let server = MockServer::start_async().await;
	let (agent, _cache) = build_reqwest_test_agent(config(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200).body(token_body("fresh", 3600));
		})
		.await;

	agent
		.retrieve(AccessTokenRequest::default())
		.await
		.expect("Initial token acquisition should succeed.");
	agent
		.retrieve(AccessTokenRequest::default().ignore_cache())
		.await
		.expect("Bypassing the cache should still succeed.");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn disabled_token_cache_always_reaches_the_service() {
	let server = MockServer::start_async().await;
	let config =
		AgentConfig::builder(server.url("/oauth/access_token"), CONSUMER_KEY, CONSUMER_SECRET)
			.cache_tokens(false)
			.build()
			.expect("Agent configuration should be valid for uncached tests.");
	let (agent, cache) = build_reqwest_test_agent(config);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200).body(token_body("uncached", 60));
		})
		.await;

	for _ in 0..2 {
		agent
			.retrieve(AccessTokenRequest::default())
			.await
			.expect("Uncached token acquisition should succeed.");
	}

	mock.assert_calls_async(2).await;

	assert!(cache.is_empty(access_token_agent::cache::TOKEN_NAMESPACE));
}

#[tokio::test]
async fn success_without_required_fields_is_a_protocol_error() {
	let server = MockServer::start_async().await;
	let (agent, _cache) = build_reqwest_test_agent(config(&server));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200).body("oauth_token=T&oauth_expires_in=3600");
		})
		.await;

	let err = agent
		.retrieve(AccessTokenRequest::default())
		.await
		.expect_err("Incomplete bodies should fail.");

	assert!(matches!(err, Error::OAuth(ref e) if e.status == Some(200) && e.problem.is_none()));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
	let config = AgentConfig::builder("http://127.0.0.1:9/oauth", CONSUMER_KEY, CONSUMER_SECRET)
		.open_timeout(std::time::Duration::from_millis(200))
		.build()
		.expect("Agent configuration should be valid for transport tests.");
	let (agent, _cache) = build_reqwest_test_agent(config);
	let err = agent
		.retrieve(AccessTokenRequest::default())
		.await
		.expect_err("Closed ports should fail.");

	assert!(matches!(err, Error::Transport(_)));
}
