//! One-time SDK script loading and readiness tracking.
//!
//! [`Loader`] moves through `NotRequested → Requested → Loaded`, or `Requested → Failed` when the
//! injector reports a failure. The first [`Loader::ensure_loaded`] call asks the
//! [`ScriptInjector`] to inject the script; every later call only queues its action. When the
//! injector fires [`LoadSignal::loaded`], queued actions run in call order and later actions run
//! immediately. A failed load drops queued actions and rejects [`Loader::ready`] with
//! [`LoadError::ScriptFailed`]; it is not retried. There is no built-in timeout.

// std
use std::sync::Weak;
// self
use crate::{
	_prelude::*,
	error::LoadError,
	obs::{self, FlowKind, FlowOutcome},
	sdk::SdkHandle,
	settle::{self, Abandoned},
};

/// Default location of the Google Identity Services client script.
pub const SCRIPT_URL: &str = "https://accounts.google.com/gsi/client";

/// Action deferred until the SDK is ready.
pub type LibraryAction = Box<dyn FnOnce(SdkHandle) + Send>;

/// Injects the SDK script into the host page (or equivalent).
pub trait ScriptInjector
where
	Self: Send + Sync,
{
	/// Starts loading `src`. Report completion through `signal`, from any thread, at any time.
	///
	/// The loader calls this at most once per [`Loader`].
	fn inject(&self, src: &str, signal: LoadSignal);
}

/// Public view of the loader's state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadPhase {
	/// Nobody asked for the SDK yet.
	NotRequested,
	/// The script was injected; waiting for it to load.
	Requested,
	/// The SDK is ready.
	Loaded,
	/// The script failed to load.
	Failed,
}
impl LoadPhase {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoadPhase::NotRequested => "not_requested",
			LoadPhase::Requested => "requested",
			LoadPhase::Loaded => "loaded",
			LoadPhase::Failed => "failed",
		}
	}
}
impl Display for LoadPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Readiness flags of the SDK. `api_loaded` implies `api_load_initiated`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LibraryState {
	/// The SDK finished loading; never reverts.
	pub api_loaded: bool,
	/// Loading was requested at least once.
	pub api_load_initiated: bool,
}

/// Process-wide SDK loader. Clones share the same state.
#[derive(Clone)]
pub struct Loader(Arc<LoaderShared>);
impl Loader {
	/// Creates a loader for the default [`SCRIPT_URL`].
	pub fn new(injector: Arc<dyn ScriptInjector>) -> Self {
		Self::from_parts(injector, SCRIPT_URL.to_owned())
	}

	/// Creates a loader for a custom script location (mirrors, self-hosting, tests).
	pub fn with_script_url(injector: Arc<dyn ScriptInjector>, url: Url) -> Self {
		Self::from_parts(injector, url.into())
	}

	fn from_parts(injector: Arc<dyn ScriptInjector>, script_url: String) -> Self {
		Self(Arc::new(LoaderShared {
			injector,
			script_url,
			inner: Mutex::new(LoaderInner { phase: Phase::NotRequested, queue: VecDeque::new() }),
		}))
	}

	/// Runs `action` with the SDK handle once it is ready.
	///
	/// Runs immediately when the SDK is already loaded; otherwise queues the action and injects
	/// the script if nobody did before. Actions queued after a failed load are dropped.
	pub fn ensure_loaded(&self, action: impl 'static + FnOnce(SdkHandle) + Send) {
		let mut inner = self.0.inner.lock();

		match &inner.phase {
			Phase::Loaded(sdk) => {
				let sdk = sdk.clone();

				drop(inner);
				action(sdk);
			},
			Phase::Failed(_) => {
				drop(inner);
				obs::record_discarded(FlowKind::Load, "action_after_failure");
			},
			Phase::Requested => inner.queue.push_back(Box::new(action)),
			Phase::NotRequested => {
				inner.queue.push_back(Box::new(action));
				inner.phase = Phase::Requested;

				drop(inner);
				obs::record_load_transition(LoadPhase::NotRequested, LoadPhase::Requested, 1);
				obs::record_flow_outcome(FlowKind::Load, FlowOutcome::Attempt);

				self.0.injector.inject(&self.0.script_url, LoadSignal(Arc::downgrade(&self.0)));
			},
		}
	}

	/// Waits for the SDK, requesting it if needed.
	pub async fn ready(&self) -> Result<SdkHandle> {
		let (settler, settlement) = settle::cell();

		self.ensure_loaded(move |sdk| {
			settler.settle(sdk);
		});

		match settlement.await {
			Ok(sdk) => Ok(sdk),
			Err(Abandoned) => Err(self.failure().unwrap_or(LoadError::Abandoned).into()),
		}
	}

	/// Current phase of the state machine.
	pub fn phase(&self) -> LoadPhase {
		self.0.inner.lock().phase.public()
	}

	/// Current readiness flags.
	pub fn state(&self) -> LibraryState {
		match self.phase() {
			LoadPhase::NotRequested => LibraryState::default(),
			LoadPhase::Requested | LoadPhase::Failed =>
				LibraryState { api_loaded: false, api_load_initiated: true },
			LoadPhase::Loaded => LibraryState { api_loaded: true, api_load_initiated: true },
		}
	}

	/// Returns true once the SDK is ready.
	pub fn is_loaded(&self) -> bool {
		matches!(self.phase(), LoadPhase::Loaded)
	}

	/// Loaded SDK handle, if any.
	pub fn sdk(&self) -> Option<SdkHandle> {
		match &self.0.inner.lock().phase {
			Phase::Loaded(sdk) => Some(sdk.clone()),
			_ => None,
		}
	}

	/// Recorded load failure, if any.
	pub fn failure(&self) -> Option<LoadError> {
		match &self.0.inner.lock().phase {
			Phase::Failed(err) => Some(err.clone()),
			_ => None,
		}
	}
}
impl Debug for Loader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let inner = self.0.inner.lock();

		f.debug_struct("Loader")
			.field("script_url", &self.0.script_url)
			.field("phase", &inner.phase.public())
			.field("queued", &inner.queue.len())
			.finish()
	}
}

/// Completion handle given to a [`ScriptInjector`].
///
/// Both methods are idempotent and ignored once the loader settled or was dropped. Clone it to
/// wire both the script `onload` event and the SDK's `onGoogleLibraryLoad` hook.
#[derive(Clone)]
pub struct LoadSignal(Weak<LoaderShared>);
impl LoadSignal {
	/// Marks the SDK ready and runs queued actions in call order.
	pub fn loaded(&self, sdk: SdkHandle) {
		let Some(shared) = self.0.upgrade() else {
			return;
		};
		let mut inner = shared.inner.lock();
		let from = inner.phase.public();

		if matches!(from, LoadPhase::Loaded | LoadPhase::Failed) {
			return;
		}

		inner.phase = Phase::Loaded(sdk.clone());

		let queue = std::mem::take(&mut inner.queue);

		drop(inner);
		obs::record_load_transition(from, LoadPhase::Loaded, queue.len());
		obs::record_flow_outcome(FlowKind::Load, FlowOutcome::Success);

		for action in queue {
			action(sdk.clone());
		}
	}

	/// Records a load failure and drops queued actions.
	pub fn failed(&self, reason: impl Into<String>) {
		let Some(shared) = self.0.upgrade() else {
			return;
		};
		let mut inner = shared.inner.lock();
		let from = inner.phase.public();

		if matches!(from, LoadPhase::Loaded | LoadPhase::Failed) {
			return;
		}

		inner.phase = Phase::Failed(LoadError::ScriptFailed { reason: reason.into() });

		let queue = std::mem::take(&mut inner.queue);

		drop(inner);
		obs::record_load_transition(from, LoadPhase::Failed, queue.len());
		obs::record_flow_outcome(FlowKind::Load, FlowOutcome::Failure);
		drop(queue);
	}
}
impl Debug for LoadSignal {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("LoadSignal(..)")
	}
}

struct LoaderShared {
	injector: Arc<dyn ScriptInjector>,
	script_url: String,
	inner: Mutex<LoaderInner>,
}

struct LoaderInner {
	phase: Phase,
	queue: VecDeque<LibraryAction>,
}

enum Phase {
	NotRequested,
	Requested,
	Loaded(SdkHandle),
	Failed(LoadError),
}
impl Phase {
	fn public(&self) -> LoadPhase {
		match self {
			Phase::NotRequested => LoadPhase::NotRequested,
			Phase::Requested => LoadPhase::Requested,
			Phase::Loaded(_) => LoadPhase::Loaded,
			Phase::Failed(_) => LoadPhase::Failed,
		}
	}
}
