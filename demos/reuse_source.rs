//! Demonstrates wrapping a hand-written client-credentials issuer in a reusing cache so repeated
//! fetches hit the token endpoint only once.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::OffsetDateTime;
// self
use token_reuse::{
	auth::{Token, parse_error_response, parse_token_response},
	error::Error,
	reqwest::Client,
	source::{TokenFuture, TokenSource, reuse_token_source_with_tolerance},
};

/// Minimal issuance collaborator: POSTs a client-credentials grant and parses the response.
struct ClientCredentialsIssuer {
	client: Client,
	token_url: String,
}
impl ClientCredentialsIssuer {
	async fn issue(&self) -> Result<Token, Error> {
		let response = self
			.client
			.post(&self.token_url)
			.form(&[("grant_type", "client_credentials")])
			.send()
			.await?;
		let status = response.status();
		let body = response.bytes().await?;

		if !status.is_success() {
			return Err(parse_error_response(Some(status.as_u16()), &body));
		}

		parse_token_response(&body, OffsetDateTime::now_utc())
	}
}
impl TokenSource for ClientCredentialsIssuer {
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(self.issue())
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()?;
	let issuer: Arc<dyn TokenSource> =
		Arc::new(ClientCredentialsIssuer { client, token_url: server.url("/token") });
	let cache = reuse_token_source_with_tolerance(None, issuer, time::Duration::seconds(30));

	for attempt in 1..=3 {
		let token = cache.token().await?;

		println!("Attempt {attempt}: {} (expires {:?}).", token.token_type(), token.expiry);
	}

	token_mock.assert_async().await;

	Ok(())
}
