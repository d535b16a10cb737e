// self
use crate::{_prelude::*, obs::FetchOutcome};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFetch<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFetch<F> = F;

/// Span wrapped around a single cached fetch.
#[derive(Clone, Debug)]
pub struct FetchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FetchSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("token_reuse.fetch", stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFetch<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits an event describing how a fetch was served. Secrets are never recorded.
pub fn trace_fetch_outcome(outcome: FetchOutcome, error: Option<&Error>) {
	#[cfg(feature = "tracing")]
	{
		match (outcome, error) {
			(FetchOutcome::Failure, Some(error)) =>
				tracing::warn!(outcome = outcome.as_str(), %error, "underlying token source failed"),
			(FetchOutcome::Renewed, _) =>
				tracing::debug!(outcome = outcome.as_str(), "stored renewed token"),
			_ => tracing::trace!(outcome = outcome.as_str(), "reused held token"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (outcome, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn trace_fetch_outcome_accepts_missing_error() {
		trace_fetch_outcome(FetchOutcome::Failure, None);
		trace_fetch_outcome(FetchOutcome::Hit, None);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FetchSpan::new("instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
