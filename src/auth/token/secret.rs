//! Opaque token strings that never leak through `Debug` or `Display`.

// self
use crate::_prelude::*;

/// Access or refresh token value kept out of logs.
///
/// The wrapper serializes transparently so tokens round-trip through their wire names, while
/// formatting only ever reports whether a value is present.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Never pass the result to a logger.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when no token material is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn placeholder(&self) -> &'static str {
		if self.is_empty() { "<empty>" } else { "<redacted>" }
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.placeholder())
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.placeholder())
	}
}
