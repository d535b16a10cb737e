//! Optional observability helpers for caching token sources.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every cached fetch in a span named `token_reuse.fetch` carrying a
//!   `stage` field, and to emit renewal events.
//! - Enable `metrics` to increment the `token_reuse_fetch_total` counter for every fetch, labeled
//!   by `outcome`.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each fetch served by a caching source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
	/// The held token was still valid and returned as-is.
	Hit,
	/// The underlying source minted a replacement.
	Renewed,
	/// The underlying source failed; the held token was left untouched.
	Failure,
}
impl FetchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchOutcome::Hit => "hit",
			FetchOutcome::Renewed => "renewed",
			FetchOutcome::Failure => "failure",
		}
	}
}
impl Display for FetchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
