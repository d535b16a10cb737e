//! Token records, their validity predicate, and a builder for issuance collaborators.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Safety margin applied when a token carries no tolerance override of its own.
pub const DEFAULT_EXPIRY_TOLERANCE: Duration = Duration::seconds(10);

/// Access credential plus the metadata needed to decide whether it is still usable.
///
/// Tokens handed out by a [`TokenSource`](crate::source::TokenSource) are treated as immutable;
/// callers that need a different tolerance work on a copy via [`Token::with_expiry_tolerance`].
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
	/// Token that authorizes requests; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Authorization scheme; [`Token::token_type`] supplies the default.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Refresh token, consumed only by the issuance collaborator.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Absolute expiry; `None` means the token never expires.
	#[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub expiry: Option<OffsetDateTime>,
	/// Relative lifetime hint in seconds as reported by the token endpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<i64>,
	/// Margin subtracted from `expiry` before comparing with the clock; zero selects
	/// [`DEFAULT_EXPIRY_TOLERANCE`].
	#[serde(skip)]
	pub expiry_tolerance: Duration,
	#[serde(skip)]
	extra: Option<JsonMap<String, JsonValue>>,
}
impl Token {
	/// Returns a builder seeded with the access token.
	pub fn builder(access_token: impl Into<String>) -> TokenBuilder {
		TokenBuilder::new(access_token.into())
	}

	/// Returns the normalized authorization scheme, defaulting to `Bearer`.
	pub fn token_type(&self) -> &str {
		match self.token_type.as_deref() {
			None | Some("") => "Bearer",
			Some(kind) if kind.eq_ignore_ascii_case("bearer") => "Bearer",
			Some(kind) if kind.eq_ignore_ascii_case("mac") => "MAC",
			Some(kind) if kind.eq_ignore_ascii_case("basic") => "Basic",
			Some(kind) => kind,
		}
	}

	/// Formats the `Authorization` header value, e.g. `Bearer ya29...`.
	pub fn authorization_value(&self) -> String {
		format!("{} {}", self.token_type(), self.access_token.expose())
	}

	/// Tolerance actually applied by the validity predicate.
	pub fn effective_expiry_tolerance(&self) -> Duration {
		if self.expiry_tolerance.is_zero() { DEFAULT_EXPIRY_TOLERANCE } else { self.expiry_tolerance }
	}

	/// Returns `true` if the token counts as expired at `now`.
	///
	/// A token expires once `expiry - tolerance` is at or before `now`. Tokens without an expiry
	/// never expire.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		let Some(expiry) = self.expiry else {
			return false;
		};

		// An edge that underflows the representable range is long past.
		expiry.checked_sub(self.effective_expiry_tolerance()).is_none_or(|edge| edge <= now)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the token carries a non-empty access token and is not expired at `now`.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		!self.access_token.is_empty() && !self.is_expired_at(now)
	}

	/// Returns `true` if the token is usable right now.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Returns a copy whose validity is judged with `tolerance`.
	pub fn with_expiry_tolerance(&self, tolerance: Duration) -> Self {
		let mut token = self.clone();

		token.expiry_tolerance = tolerance;

		token
	}

	/// Returns a copy carrying `extra` as raw metadata from the issuer.
	pub fn with_extra(&self, extra: JsonMap<String, JsonValue>) -> Self {
		let mut token = self.clone();

		token.extra = Some(extra);

		token
	}

	/// Looks up a raw metadata field attached by the issuer.
	pub fn extra(&self, key: &str) -> Option<&JsonValue> {
		self.extra.as_ref()?.get(key)
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &self.access_token)
			.field("token_type", &self.token_type)
			.field("refresh_token", &self.refresh_token)
			.field("expiry", &self.expiry)
			.field("expires_in", &self.expires_in)
			.field("expiry_tolerance", &self.expiry_tolerance)
			.field("extra", &self.extra.as_ref().map(|map| map.len()))
			.finish()
	}
}

/// Validity predicate that also covers an absent token.
pub fn valid_at(token: Option<&Token>, now: OffsetDateTime) -> bool {
	token.is_some_and(|token| token.is_valid_at(now))
}

/// [`valid_at`] evaluated against the current clock.
pub fn valid(token: Option<&Token>) -> bool {
	valid_at(token, OffsetDateTime::now_utc())
}

/// Builder for [`Token`].
#[derive(Clone, Debug)]
pub struct TokenBuilder {
	access_token: TokenSecret,
	token_type: Option<String>,
	refresh_token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
	expiry_tolerance: Duration,
	extra: Option<JsonMap<String, JsonValue>>,
}
impl TokenBuilder {
	fn new(access_token: String) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			token_type: None,
			refresh_token: None,
			issued_at: None,
			expires_at: None,
			expires_in: None,
			expiry_tolerance: Duration::ZERO,
			extra: None,
		}
	}

	/// Sets the authorization scheme.
	pub fn token_type(mut self, kind: impl Into<String>) -> Self {
		self.token_type = Some(kind.into());

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets the instant `expires_in` is measured from (defaults to the build instant).
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant; takes precedence over [`TokenBuilder::expires_in`].
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative lifetime and records it as the `expires_in` hint.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Overrides the expiry tolerance.
	pub fn expiry_tolerance(mut self, tolerance: Duration) -> Self {
		self.expiry_tolerance = tolerance;

		self
	}

	/// Attaches raw metadata from the issuer.
	pub fn extra(mut self, extra: JsonMap<String, JsonValue>) -> Self {
		self.extra = Some(extra);

		self
	}

	/// Consumes the builder and produces a [`Token`].
	pub fn build(self) -> Token {
		let expiry = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => Some(instant),
			(None, Some(delta)) => {
				let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);

				// Saturate at the representable range; overflow must never read as "no expiry".
				Some(issued_at.checked_add(delta).unwrap_or(if delta.is_negative() {
					PrimitiveDateTime::MIN.assume_utc()
				} else {
					PrimitiveDateTime::MAX.assume_utc()
				}))
			},
			(None, None) => None,
		};

		Token {
			access_token: self.access_token,
			token_type: self.token_type,
			refresh_token: self.refresh_token,
			expiry,
			expires_in: self.expires_in.map(|delta| delta.whole_seconds()),
			expiry_tolerance: self.expiry_tolerance,
			extra: self.extra,
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn empty_access_token_is_never_valid() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let forever = Token::builder("").build();
		let later = Token::builder("").expires_at(now + Duration::hours(1)).build();

		assert!(!forever.is_valid_at(now));
		assert!(!later.is_valid_at(now));
		assert!(!valid_at(Some(&later), now));
	}

	#[test]
	fn absent_token_is_not_valid() {
		assert!(!valid(None));
	}

	#[test]
	fn token_without_expiry_stays_valid() {
		let token = Token::builder("forever").build();

		assert!(token.is_valid_at(macros::datetime!(1970-01-01 00:00 UTC)));
		assert!(token.is_valid_at(macros::datetime!(9999-12-31 23:59 UTC)));
		assert!(!token.is_expired());
	}

	#[test]
	fn default_tolerance_applies_at_the_edge() {
		let expiry = macros::datetime!(2025-01-01 01:00 UTC);
		let token = Token::builder("access").expires_at(expiry).build();

		assert_eq!(token.effective_expiry_tolerance(), DEFAULT_EXPIRY_TOLERANCE);
		assert!(token.is_valid_at(expiry - Duration::seconds(11)));
		assert!(!token.is_valid_at(expiry - Duration::seconds(10)));
		assert!(!token.is_valid_at(expiry - Duration::seconds(9)));
	}

	#[test]
	fn explicit_tolerance_overrides_default() {
		let expiry = macros::datetime!(2025-01-01 01:00 UTC);
		let token = Token::builder("access")
			.expires_at(expiry)
			.expiry_tolerance(Duration::minutes(5))
			.build();

		assert!(token.is_valid_at(expiry - Duration::minutes(6)));
		assert!(token.is_expired_at(expiry - Duration::minutes(5)));

		let relaxed = token.with_expiry_tolerance(Duration::seconds(1));

		assert!(relaxed.is_valid_at(expiry - Duration::seconds(2)));
		assert!(relaxed.is_expired_at(expiry - Duration::seconds(1)));
		assert_eq!(token.expiry_tolerance, Duration::minutes(5));
	}

	#[test]
	fn builder_handles_relative_expiry() {
		let token = Token::builder("secret")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::minutes(30))
			.build();

		assert_eq!(token.expiry, Some(macros::datetime!(2025-01-01 00:30 UTC)));
		assert_eq!(token.expires_in, Some(1_800));
	}

	#[test]
	fn overflowing_relative_expiry_saturates() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let past = Token::builder("past").issued_at(issued).expires_in(Duration::MIN).build();

		assert!(past.expiry.is_some());
		assert!(past.is_expired_at(issued));

		let future = Token::builder("future").issued_at(issued).expires_in(Duration::MAX).build();

		assert!(future.expiry.is_some_and(|expiry| expiry > issued));
		assert!(future.is_valid_at(issued));
	}

	#[test]
	fn token_type_is_normalized() {
		let kinds = [
			(None, "Bearer"),
			(Some("bearer"), "Bearer"),
			(Some("MAC"), "MAC"),
			(Some("mac"), "MAC"),
			(Some("BASIC"), "Basic"),
			(Some("DPoP"), "DPoP"),
		];

		for (kind, expected) in kinds {
			let mut token = Token::builder("t").build();

			token.token_type = kind.map(str::to_owned);

			assert_eq!(token.token_type(), expected);
		}

		assert_eq!(Token::builder("abc").build().authorization_value(), "Bearer abc");
	}

	#[test]
	fn extra_metadata_is_passed_through() {
		let mut extra = JsonMap::new();

		extra.insert("id_token".into(), JsonValue::from("header.payload.sig"));

		let token = Token::builder("t").build();
		let enriched = token.with_extra(extra);

		assert!(token.extra("id_token").is_none());
		assert_eq!(enriched.extra("id_token"), Some(&JsonValue::from("header.payload.sig")));
		assert!(enriched.extra("missing").is_none());
	}

	#[test]
	fn serde_skips_local_state_and_debug_redacts() {
		let token = Token::builder("access")
			.refresh_token("refresh")
			.expires_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expiry_tolerance(Duration::minutes(1))
			.build();
		let json = serde_json::to_value(&token).expect("Tokens should serialize to JSON.");

		assert_eq!(json["access_token"], "access");
		assert_eq!(json["expiry"], "2025-01-01T00:00:00Z");
		assert!(json.get("expiry_tolerance").is_none());
		assert!(json.get("token_type").is_none());

		let debug = format!("{token:?}");

		assert!(!debug.contains("access\""));
		assert!(!debug.contains("refresh\""));
	}
}
