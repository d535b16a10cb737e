//! Request signing contracts that attach tokens to outbound HTTP requests.

// self
use crate::{_prelude::*, auth::Token, source::TokenSource};

/// Describes how to attach a [`Token`] to an outbound request without constraining the HTTP
/// client type.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the provided request and injects the `Authorization` header derived from `token`.
	fn attach_token(&self, request: Request, token: &Token) -> Result<Request, Error>;
}

/// Signer that sets `Authorization: <type> <token>` using [`Token::authorization_value`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerSigner;
#[cfg(feature = "reqwest")]
impl RequestSignerExt<ReqwestRequestBuilder, Error> for BearerSigner {
	fn attach_token(
		&self,
		request: ReqwestRequestBuilder,
		token: &Token,
	) -> Result<ReqwestRequestBuilder, Error> {
		Ok(request.header(reqwest::header::AUTHORIZATION, token.authorization_value()))
	}
}

/// Fetches a token from `source` and attaches it to `request` with `signer`.
///
/// Failures from the source propagate unchanged; the request is dropped in that case.
pub async fn sign_request<S, R, Req>(source: &S, signer: &R, request: Req) -> Result<Req>
where
	S: ?Sized + TokenSource,
	R: ?Sized + RequestSignerExt<Req, Error>,
{
	let token = source.token().await?;

	signer.attach_token(request, &token)
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::source::StaticTokenSource;

	#[tokio::test]
	async fn sign_request_sets_authorization_header() {
		let source = StaticTokenSource::new(Token::builder("abc").token_type("mac").build());
		let request = reqwest::Client::new().get("https://example.com/resource");
		let signed = sign_request(&source, &BearerSigner, request)
			.await
			.expect("Signing with a static source should succeed.")
			.build()
			.expect("Signed request should build.");

		assert_eq!(
			signed
				.headers()
				.get(reqwest::header::AUTHORIZATION)
				.and_then(|value| value.to_str().ok()),
			Some("MAC abc")
		);
	}
}
