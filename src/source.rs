//! Token source capability and its built-in variants.
//!
//! A [`TokenSource`] hands out a [`Token`] on demand. Two variants ship with the crate:
//! [`StaticTokenSource`] always returns the same token, and [`ReuseTokenSource`] keeps the last
//! token while it is valid and asks an underlying source for a replacement otherwise. Issuance
//! collaborators (an OAuth client, a metadata-server client, a test double) implement the trait
//! themselves.

pub mod fixed;
pub mod reuse;

pub use fixed::StaticTokenSource;
pub use reuse::{ReuseTokenSource, reuse_token_source, reuse_token_source_with_tolerance};

// self
use crate::{_prelude::*, auth::Token};

/// Boxed future returned by [`TokenSource::token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<Token>> + 'a + Send>>;

/// Capability that produces tokens on demand.
///
/// Implementations must tolerate concurrent calls; a source that cannot must serialize
/// internally. Returned tokens are owned copies, so callers may adjust them freely without
/// affecting the source.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Returns a token, or the failure that prevented obtaining one.
	fn token(&self) -> TokenFuture<'_>;

	/// Identifies caching sources so constructors can avoid stacking caches.
	///
	/// Only [`ReuseTokenSource`] returns `Some`; wrappers must forward the call.
	fn as_reuse(&self) -> Option<&ReuseTokenSource> {
		None
	}
}
impl<T> TokenSource for Arc<T>
where
	T: ?Sized + TokenSource,
{
	fn token(&self) -> TokenFuture<'_> {
		(**self).token()
	}

	fn as_reuse(&self) -> Option<&ReuseTokenSource> {
		(**self).as_reuse()
	}
}
impl<T> TokenSource for Box<T>
where
	T: ?Sized + TokenSource,
{
	fn token(&self) -> TokenFuture<'_> {
		(**self).token()
	}

	fn as_reuse(&self) -> Option<&ReuseTokenSource> {
		(**self).as_reuse()
	}
}
