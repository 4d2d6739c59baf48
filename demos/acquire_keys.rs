//! Demonstrates acquiring an Access Token and a Keys version with the default reqwest transport
//! and a shared cache, against a local mock of the Access Token service.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use access_token_agent::{
	agent::{AccessTokenAgent, AccessTokenRequest, AgentConfig, KeysRequest},
	cache::AgentCache,
	http::ReqwestHttpClient,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=demo-token&oauth_token_secret=demo-secret&oauth_expires_in=900");
		})
		.await;
	let keys_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/keys/demo");
			then.status(200).header("content-type", "application/json").body(
				r#"{"aesKey":{"secretKey":"YWVzLXNlY3JldC1rZXktbWF0ZXJpYWw="},"rsaKey":{"publicKey":"cnNhLXB1YmxpYy1rZXktZGVy"}}"#,
			);
		})
		.await;
	let config = AgentConfig::builder(server.url("/oauth"), "demo-consumer", "demo-consumer-secret")
		.signature_method("HMAC-SHA1")
		.build()?;
	let cache = Arc::new(AgentCache::default());
	let http_client = ReqwestHttpClient::with_client(Client::builder().build()?);
	let agent = <AccessTokenAgent<ReqwestHttpClient>>::with_http_client(config, cache, http_client);
	let keys = agent.retrieve_keys(KeysRequest::new("demo")).await?;
	let token = agent.retrieve(AccessTokenRequest::default()).await?;

	println!("Keys version {} with a {}-byte AES key.", keys.version, keys.aes_secret_key.len());
	println!("Cached access token {} expires at {}.", token.token, token.expires_at);

	token_mock.assert_async().await;
	keys_mock.assert_async().await;

	Ok(())
}
