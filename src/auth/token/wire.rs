//! Token-endpoint JSON payloads and their conversion into [`Token`] values.
//!
//! Issuance collaborators call [`parse_token_response`] on a successful body and
//! [`parse_error_response`] on a failed one. Caching sources never touch this module; they only
//! see the resulting [`Token`] or [`Error`].

// self
use crate::{
	_prelude::*,
	auth::token::{record::Token, secret::TokenSecret},
};

/// Successful token-endpoint response (RFC 6749 §5.1).
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Issued access token.
	#[serde(default)]
	pub access_token: Option<TokenSecret>,
	/// Authorization scheme reported by the server.
	#[serde(default)]
	pub token_type: Option<String>,
	/// Issued refresh token, if any.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime in seconds; accepted as a JSON number or a numeric string.
	#[serde(default, deserialize_with = "deserialize_seconds")]
	pub expires_in: Option<i64>,
	/// Every field not listed above, preserved as raw metadata.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl TokenResponse {
	/// Converts the response into a [`Token`], anchoring `expires_in` at `now`.
	///
	/// A zero or absent `expires_in` leaves the expiry unset. Lifetimes are clamped to the `i32`
	/// range of seconds, so a negative lifetime always yields an already-expired token.
	pub fn into_token(self, now: OffsetDateTime) -> Result<Token> {
		let access_token = match self.access_token {
			Some(token) if !token.is_empty() => token,
			_ => return Err(Error::MissingAccessToken),
		};
		let mut builder = Token::builder(access_token.expose()).issued_at(now);

		if let Some(kind) = self.token_type {
			builder = builder.token_type(kind);
		}
		if let Some(refresh) = self.refresh_token {
			builder = builder.refresh_token(refresh.expose());
		}
		if let Some(seconds) = self.expires_in.filter(|seconds| *seconds != 0) {
			let seconds = seconds.clamp(i64::from(i32::MIN), i64::from(i32::MAX));

			builder = builder.expires_in(Duration::seconds(seconds));
		}
		if !self.extra.is_empty() {
			builder = builder.extra(self.extra);
		}

		Ok(builder.build())
	}
}

/// Error body returned by a token endpoint (RFC 6749 §5.2).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorResponse {
	/// OAuth 2.0 error code.
	#[serde(default)]
	pub error: Option<String>,
	/// Human-readable description.
	#[serde(default)]
	pub error_description: Option<String>,
}

/// Parses a successful token-endpoint body into a [`Token`].
pub fn parse_token_response(body: &[u8], now: OffsetDateTime) -> Result<Token> {
	let de = &mut serde_json::Deserializer::from_slice(body);
	let response: TokenResponse = serde_path_to_error::deserialize(de)
		.map_err(|source| Error::TokenResponseParse { source })?;

	response.into_token(now)
}

/// Builds an [`Error::Retrieve`] from a failed token-endpoint response.
///
/// Bodies that are not RFC 6749 error objects still produce an error carrying the status.
pub fn parse_error_response(status: Option<u16>, body: &[u8]) -> Error {
	let ErrorResponse { error, error_description } =
		serde_json::from_slice(body).unwrap_or_default();

	Error::Retrieve { status, code: error, description: error_description }
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Seconds {
		Number(i64),
		Text(String),
	}

	match Option::<Seconds>::deserialize(deserializer)? {
		None => Ok(None),
		Some(Seconds::Number(value)) => Ok(Some(value)),
		Some(Seconds::Text(raw)) if raw.trim().is_empty() => Ok(None),
		Some(Seconds::Text(raw)) => raw.trim().parse().map(Some).map_err(serde::de::Error::custom),
	}
}
