//! Caching token source that renews through an underlying source exactly once per expiry.
//!
//! [`ReuseTokenSource`] holds the most recent token in a single slot guarded by an async mutex.
//! Every fetch takes the lock, returns the held token if it is still valid, and otherwise calls
//! the underlying source while still holding the lock. Concurrent callers that race on an
//! expired token therefore queue behind one renewal and then observe its result instead of
//! stampeding the issuer. A failed renewal leaves the slot as it was.
//!
//! Build instances with [`reuse_token_source`] or [`reuse_token_source_with_tolerance`]; both
//! detect an underlying source that is already a [`ReuseTokenSource`] and collapse the layers so
//! a chain never contains more than one cache.

// self
use crate::{
	_prelude::*,
	auth::Token,
	obs::{self, FetchOutcome, FetchSpan},
	source::{TokenFuture, TokenSource},
};

/// Caching [`TokenSource`] that reuses its held token while valid.
///
/// The type is a cheap handle: clones share the same slot, underlying source, and tolerance
/// override. Use [`ReuseTokenSource::ptr_eq`] to check whether two handles are the same cache.
///
/// A failed renewal is not shared: callers that were waiting on the slot each retry the
/// underlying source in turn once the failing call releases it.
#[derive(Clone)]
pub struct ReuseTokenSource(Arc<ReuseState>);
impl ReuseTokenSource {
	fn new(seed: Option<Token>, underlying: Arc<dyn TokenSource>, tolerance: Duration) -> Self {
		Self(Arc::new(ReuseState {
			held: AsyncMutex::new(seed),
			underlying,
			expiry_tolerance: RwLock::new(tolerance),
		}))
	}

	/// Tolerance stamped onto every token this cache stores; zero selects the default.
	pub fn expiry_tolerance(&self) -> Duration {
		*self.0.expiry_tolerance.read()
	}

	/// Source consulted when the held token is missing or no longer valid.
	pub fn underlying(&self) -> &Arc<dyn TokenSource> {
		&self.0.underlying
	}

	/// Returns `true` if both handles refer to the same cache.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	fn set_expiry_tolerance(&self, tolerance: Duration) {
		*self.0.expiry_tolerance.write() = tolerance;
	}

	async fn fetch(&self) -> Result<Token> {
		let mut held = self.0.held.lock().await;

		if let Some(token) = (*held).as_ref().filter(|token| token.is_valid()) {
			obs::record_fetch_outcome(FetchOutcome::Hit);
			obs::trace_fetch_outcome(FetchOutcome::Hit, None);

			return Ok(token.clone());
		}

		match self.0.underlying.token().await {
			Ok(mut token) => {
				token.expiry_tolerance = self.expiry_tolerance();
				*held = Some(token.clone());

				obs::record_fetch_outcome(FetchOutcome::Renewed);
				obs::trace_fetch_outcome(FetchOutcome::Renewed, None);

				Ok(token)
			},
			Err(e) => {
				obs::record_fetch_outcome(FetchOutcome::Failure);
				obs::trace_fetch_outcome(FetchOutcome::Failure, Some(&e));

				Err(e)
			},
		}
	}
}
impl TokenSource for ReuseTokenSource {
	fn token(&self) -> TokenFuture<'_> {
		let span = FetchSpan::new("reuse_token_source");

		Box::pin(span.instrument(self.fetch()))
	}

	fn as_reuse(&self) -> Option<&ReuseTokenSource> {
		Some(self)
	}
}
impl Debug for ReuseTokenSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReuseTokenSource")
			.field("expiry_tolerance", &self.expiry_tolerance())
			.finish_non_exhaustive()
	}
}

struct ReuseState {
	held: AsyncMutex<Option<Token>>,
	underlying: Arc<dyn TokenSource>,
	expiry_tolerance: RwLock<Duration>,
}

/// Wraps `underlying` in a cache seeded with `seed`, using the default expiry tolerance.
///
/// - If `underlying` is already a [`ReuseTokenSource`] and `seed` is `None`, that cache is
///   returned unchanged.
/// - If `underlying` is already a [`ReuseTokenSource`] and `seed` is present, the new cache wraps
///   the existing cache's own underlying source instead of the cache itself.
///
/// The seed keeps whatever tolerance it already carries.
pub fn reuse_token_source(seed: Option<Token>, underlying: Arc<dyn TokenSource>) -> ReuseTokenSource {
	let underlying = match underlying.as_reuse().cloned() {
		Some(existing) if seed.is_none() => return existing,
		Some(existing) => existing.underlying().clone(),
		None => underlying,
	};

	ReuseTokenSource::new(seed, underlying, Duration::ZERO)
}

/// Like [`reuse_token_source`], but judges every stored token with `tolerance`.
///
/// When `underlying` is already a [`ReuseTokenSource`] and `seed` is `None`, that cache is
/// returned after its tolerance override has been replaced with `tolerance`; every handle sharing
/// the cache observes the change on its next renewal. A present seed is stamped with `tolerance`.
pub fn reuse_token_source_with_tolerance(
	seed: Option<Token>,
	underlying: Arc<dyn TokenSource>,
	tolerance: Duration,
) -> ReuseTokenSource {
	let underlying = match underlying.as_reuse().cloned() {
		Some(existing) if seed.is_none() => {
			existing.set_expiry_tolerance(tolerance);

			return existing;
		},
		Some(existing) => existing.underlying().clone(),
		None => underlying,
	};
	let seed = seed.map(|mut token| {
		token.expiry_tolerance = tolerance;

		token
	});

	ReuseTokenSource::new(seed, underlying, tolerance)
}
