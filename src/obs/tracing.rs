// self
use crate::{_prelude::*, loader::LoadPhase, obs::FlowKind};

/// Flow future wrapped in its `gsi_bridge.flow` span (with `tracing`).
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Flow future left untouched (without `tracing`).
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span covering one awaited SDK interaction, from readiness to settlement.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens the span for the call made at `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("gsi_bridge.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Attaches the span to `fut`, entering it on every poll while the call waits on the SDK.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
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

/// Emits a loader phase transition; failures log at `warn`, everything else at `debug`.
pub fn record_load_transition(from: LoadPhase, to: LoadPhase, queued: usize) {
	#[cfg(feature = "tracing")]
	{
		if matches!(to, LoadPhase::Failed) {
			tracing::warn!(from = from.as_str(), to = to.as_str(), queued, "SDK load failed.");
		} else {
			tracing::debug!(from = from.as_str(), to = to.as_str(), queued, "SDK load transition.");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (from, to, queued);
	}
}

/// Logs an SDK event that lost the settlement race or arrived after a failed load.
pub fn trace_discarded(kind: FlowKind, what: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(flow = kind.as_str(), what, "Discarded late event.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, what);
	}
}
