#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use token_reuse::{
	_preludet::*,
	ext::{BearerSigner, sign_request},
	source::{TokenSource, reuse_token_source},
};

#[tokio::test]
async fn signed_requests_carry_the_cached_token() {
	let server = MockServer::start_async().await;
	let resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/resource").header("authorization", "Bearer svc-1");
			then.status(200).body("ok");
		})
		.await;
	let underlying = Arc::new(CountingSource::new("svc", Duration::hours(1)));
	let cache = reuse_token_source(None, underlying.clone());
	let client = test_reqwest_client();

	for _ in 0..2 {
		let request = sign_request(&cache, &BearerSigner, client.get(server.url("/resource")))
			.await
			.expect("Signing should succeed while the cache can renew.");
		let response = request.send().await.expect("Mock resource should respond.");

		assert_eq!(response.status().as_u16(), 200);
	}

	resource_mock.assert_hits_async(2).await;

	assert_eq!(underlying.calls(), 1);
}

#[tokio::test]
async fn signing_fails_when_the_source_fails() {
	let underlying = Arc::new(FailingSource::default());
	let cache = reuse_token_source(None, underlying.clone());
	let request = test_reqwest_client().get("https://example.invalid/resource");
	let err = sign_request(&cache, &BearerSigner, request)
		.await
		.expect_err("Source failures should prevent signing.");

	assert!(matches!(err, Error::Retrieve { .. }));
	assert_eq!(underlying.calls(), 1);
	assert!(cache.as_reuse().is_some());
}
