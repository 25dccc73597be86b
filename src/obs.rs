//! Optional observability helpers for bridge flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `gsi_bridge.flow` with the `flow` (interaction
//!   kind) and `stage` (call site) fields, plus loader transition events.
//! - Enable `metrics` to increment the `gsi_bridge_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and `gsi_bridge_discarded_total` for
//!   every late SDK event, labeled by `flow` + `what`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Records an SDK event the bridge drops because its call already settled.
pub fn record_discarded(kind: FlowKind, what: &'static str) {
	trace_discarded(kind, what);
	count_discarded(kind, what);
}

/// Interaction kinds observed by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization-code popup.
	CodePopup,
	/// Access-token popup.
	TokenPopup,
	/// One-Tap / automatic-login prompt.
	Prompt,
	/// SDK script load.
	Load,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::CodePopup => "code_popup",
			FlowKind::TokenPopup => "token_popup",
			FlowKind::Prompt => "prompt",
			FlowKind::Load => "load",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a bridge helper.
	Attempt,
	/// Successful settlement.
	Success,
	/// Rejection propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}

	/// Maps a settled result onto its outcome label.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => FlowOutcome::Success,
			Err(_) => FlowOutcome::Failure,
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
