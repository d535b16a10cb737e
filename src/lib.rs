//! Bearer-token reuse for Rust: cache a possibly-expiring access token, renew it exactly once
//! under contention, and never nest caches.
//!
//! The crate revolves around three pieces:
//!
//! - [`auth::Token`], the credential plus its expiry metadata and validity predicate.
//! - [`source::TokenSource`], the capability that produces tokens on demand, with a fixed
//!   ([`source::StaticTokenSource`]) and a caching ([`source::ReuseTokenSource`]) variant.
//! - [`source::reuse_token_source`] / [`source::reuse_token_source_with_tolerance`], which build
//!   caching sources while collapsing redundant cache layers.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod obs;
pub mod source;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use crate::{
		auth::Token,
		source::{TokenFuture, TokenSource},
	};

	/// Underlying source that mints `"{prefix}-{n}"` tokens and counts its own invocations.
	///
	/// Each minted token expires `lifetime` after the call. An optional artificial delay keeps
	/// the renewal in flight long enough for concurrent callers to pile up behind the cache.
	#[derive(Debug)]
	pub struct CountingSource {
		prefix: String,
		lifetime: Duration,
		delay: std::time::Duration,
		calls: AtomicUsize,
	}
	impl CountingSource {
		/// Creates a counting source whose tokens live for `lifetime`.
		pub fn new(prefix: impl Into<String>, lifetime: Duration) -> Self {
			Self {
				prefix: prefix.into(),
				lifetime,
				delay: std::time::Duration::ZERO,
				calls: AtomicUsize::new(0),
			}
		}

		/// Sleeps for `delay` inside every call before returning the token.
		///
		/// The sleep blocks the calling worker thread; use it only from
		/// `#[tokio::test(flavor = "multi_thread")]` tests.
		pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
			self.delay = delay;

			self
		}

		/// Number of times [`TokenSource::token`] has been invoked.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl TokenSource for CountingSource {
		fn token(&self) -> TokenFuture<'_> {
			Box::pin(async move {
				let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

				if !self.delay.is_zero() {
					std::thread::sleep(self.delay);
				}

				Ok(Token::builder(format!("{}-{n}", self.prefix))
					.expires_at(OffsetDateTime::now_utc() + self.lifetime)
					.build())
			})
		}
	}

	/// Underlying source that always fails with [`Error::Retrieve`] and counts its invocations.
	#[derive(Debug, Default)]
	pub struct FailingSource {
		calls: AtomicUsize,
	}
	impl FailingSource {
		/// Number of times [`TokenSource::token`] has been invoked.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl TokenSource for FailingSource {
		fn token(&self) -> TokenFuture<'_> {
			Box::pin(async move {
				self.calls.fetch_add(1, Ordering::SeqCst);

				Err(Error::Retrieve {
					status: Some(503),
					code: Some("temporarily_unavailable".into()),
					description: None,
				})
			})
		}
	}

	/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`
	/// during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_client() -> ReqwestClient {
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Builds a token that expired `ago` before now.
	pub fn expired_token(access: &str, ago: Duration) -> Token {
		Token::builder(access).expires_at(OffsetDateTime::now_utc() - ago).build()
	}

	/// Builds a token that expires `within` from now.
	pub fn fresh_token(access: &str, within: Duration) -> Token {
		Token::builder(access).expires_at(OffsetDateTime::now_utc() + within).build()
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, RequestBuilder as ReqwestRequestBuilder,
	};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
#[cfg(test)] use {color_eyre as _, httpmock as _, token_reuse as _};
