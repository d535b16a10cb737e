//! Token source that returns one caller-supplied token forever.

// std
use std::future;
// self
use crate::{
	_prelude::*,
	auth::Token,
	source::{TokenFuture, TokenSource},
};

/// Source that always yields the same token without I/O and without failing.
///
/// Useful when the caller already holds a long-lived token. The token is never renewed, so once
/// it expires every consumer sees an expired token.
#[derive(Clone, Debug)]
pub struct StaticTokenSource(Token);
impl StaticTokenSource {
	/// Wraps `token`.
	pub fn new(token: Token) -> Self {
		Self(token)
	}
}
impl From<Token> for StaticTokenSource {
	fn from(token: Token) -> Self {
		Self::new(token)
	}
}
impl TokenSource for StaticTokenSource {
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(future::ready(Ok(self.0.clone())))
	}
}
