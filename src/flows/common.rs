//! Shared helpers for flow implementations (scope formatting, request state, instrumentation).

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Scopes requested when a popup call names none.
pub const DEFAULT_SCOPE: &str = "openid email profile";

const STATE_LEN: usize = 32;

/// Joins scopes with the SDK's space delimiter, dropping blanks and duplicates in order.
///
/// Returns [`DEFAULT_SCOPE`] when nothing remains.
pub(crate) fn format_scope<S>(scopes: &[S]) -> String
where
	S: AsRef<str>,
{
	let mut seen = Vec::<&str>::new();

	for scope in scopes.iter().flat_map(|scope| scope.as_ref().split_whitespace()) {
		if !seen.contains(&scope) {
			seen.push(scope);
		}
	}

	if seen.is_empty() { DEFAULT_SCOPE.to_owned() } else { seen.join(" ") }
}

/// Generates the opaque `state` value attached to a popup request.
pub(crate) fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

/// Runs `fut` inside a flow span and records its attempt and outcome.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	obs::record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	obs::record_flow_outcome(kind, FlowOutcome::of(&result));

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scope_formatting_dedups_and_defaults() {
		assert_eq!(format_scope(&["email", "profile email", " "]), "email profile");
		assert_eq!(format_scope::<&str>(&[]), DEFAULT_SCOPE);
		assert_eq!(format_scope(&[String::from("  ")]), DEFAULT_SCOPE);
	}

	#[test]
	fn random_state_is_alphanumeric() {
		let first = random_state();
		let second = random_state();

		assert_eq!(first.len(), STATE_LEN);
		assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(first, second);
	}

	#[tokio::test]
	async fn observe_passes_result_through() {
		let ok = observe(FlowKind::Prompt, "observe_ok", async { Ok(7) }).await;
		let err: Result<()> = observe(FlowKind::Prompt, "observe_err", async {
			Err(Error::Abandoned)
		})
		.await;

		assert_eq!(ok.expect("Ok result should pass through."), 7);
		assert!(matches!(err, Err(Error::Abandoned)));
	}
}
