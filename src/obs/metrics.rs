// self
use crate::obs::{FlowKind, FlowOutcome};

/// Bumps `gsi_bridge_flow_total` for one stage of a bridge call; a no-op without `metrics`.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"gsi_bridge_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Bumps `gsi_bridge_discarded_total` for an SDK event that arrived after its call settled.
pub fn count_discarded(kind: FlowKind, what: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("gsi_bridge_discarded_total", "flow" => kind.as_str(), "what" => what)
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, what);
	}
}
