// self
use crate::obs::FetchOutcome;

/// Records a fetch outcome via the global metrics recorder (when enabled).
pub fn record_fetch_outcome(outcome: FetchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("token_reuse_fetch_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
