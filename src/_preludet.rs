//! Convenience re-exports and test doubles for integration tests; enabled via `cfg(test)` or the
//! `test` crate feature.

pub use crate::_prelude::*;

// std
use std::task::{Context, Poll};
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{
	flows::GoogleAuth,
	loader::{LoadSignal, Loader, ScriptInjector},
	sdk::{
		ButtonConfig, ButtonParent, Callback, CodeClient, CodeClientConfig, CodeResponse,
		CredentialResponse, IdApi, IdConfiguration, IdentitySdk, NotificationListener, OAuth2Api,
		OverridableTokenClientConfig, PromptNotification, SdkHandle, TokenClient,
		TokenClientConfig, TokenResponse,
	},
};

/// In-process SDK double that records every call and lets tests fire SDK callbacks.
#[derive(Clone, Default)]
pub struct FakeSdk(Arc<Mutex<FakeSdkInner>>);
impl FakeSdk {
	/// Fresh fake behind an [`SdkHandle`].
	pub fn handle() -> SdkHandle {
		Arc::new(Self::default())
	}

	/// Number of `initialize` calls.
	pub fn initialized(&self) -> usize {
		self.0.lock().configurations.len()
	}

	/// Configuration passed to the latest `initialize` call.
	pub fn last_configuration(&self) -> Option<IdConfiguration> {
		self.0.lock().configurations.last().cloned()
	}

	/// Number of `prompt` calls.
	pub fn prompts(&self) -> usize {
		self.0.lock().listeners.len()
	}

	/// Delivers `response` to the credential callback of the latest configuration.
	///
	/// Returns false when no callback is registered.
	pub fn emit_credential(&self, response: CredentialResponse) -> bool {
		let callback = self.0.lock().configurations.last().and_then(|config| config.callback.clone());

		match callback {
			Some(callback) => {
				callback.call(response);

				true
			},
			None => false,
		}
	}

	/// Delivers `notification` to the listener of the latest prompt.
	///
	/// Returns false when the latest prompt registered no listener.
	pub fn notify(&self, notification: PromptNotification) -> bool {
		let listener = self.0.lock().listeners.last().cloned().flatten();

		match listener {
			Some(listener) => {
				listener.call(notification);

				true
			},
			None => false,
		}
	}

	/// Configurations of every token client created so far.
	pub fn token_clients(&self) -> Vec<TokenClientConfig> {
		self.0.lock().token_clients.clone()
	}

	/// Configurations of every code client created so far.
	pub fn code_clients(&self) -> Vec<CodeClientConfig> {
		self.0.lock().code_clients.clone()
	}

	/// Number of `requestAccessToken` calls.
	pub fn token_requests(&self) -> usize {
		self.0.lock().token_requests
	}

	/// Number of `requestCode` calls.
	pub fn code_requests(&self) -> usize {
		self.0.lock().code_requests
	}

	/// Fires the callback of token client `idx`.
	pub fn respond_token(&self, idx: usize, response: TokenResponse) {
		let callback = self.0.lock().token_clients[idx]
			.callback
			.clone()
			.expect("Token client should carry a callback.");

		callback.call(response);
	}

	/// Fires the callback of code client `idx`.
	pub fn respond_code(&self, idx: usize, response: CodeResponse) {
		let callback = self.0.lock().code_clients[idx]
			.callback
			.clone()
			.expect("Code client should carry a callback.");

		callback.call(response);
	}

	/// Forgets every stored callback, as if the SDK dropped them without firing.
	pub fn drop_callbacks(&self) {
		let mut inner = self.0.lock();

		inner.configurations.iter_mut().for_each(|config| config.callback = None);
		inner.listeners.clear();
		inner.token_clients.iter_mut().for_each(|config| config.callback = None);
		inner.code_clients.iter_mut().for_each(|config| config.callback = None);
	}

	/// Buttons rendered so far.
	pub fn rendered_buttons(&self) -> Vec<(ButtonParent, ButtonConfig)> {
		self.0.lock().buttons.clone()
	}

	/// Number of `disableAutoSelect` calls.
	pub fn disable_auto_select_calls(&self) -> usize {
		self.0.lock().disable_auto_select_calls
	}

	/// Number of `cancel` calls.
	pub fn cancel_calls(&self) -> usize {
		self.0.lock().cancel_calls
	}

	/// Hints passed to `accounts.id.revoke`.
	pub fn revoked_hints(&self) -> Vec<String> {
		self.0.lock().revoked_hints.clone()
	}

	/// Access tokens passed to `accounts.oauth2.revoke`.
	pub fn revoked_tokens(&self) -> Vec<String> {
		self.0.lock().revoked_tokens.clone()
	}
}
impl Debug for FakeSdk {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let inner = self.0.lock();

		f.debug_struct("FakeSdk")
			.field("initialized", &inner.configurations.len())
			.field("prompts", &inner.listeners.len())
			.field("token_clients", &inner.token_clients.len())
			.field("code_clients", &inner.code_clients.len())
			.finish()
	}
}
impl IdentitySdk for FakeSdk {
	fn id(&self) -> &dyn IdApi {
		self
	}

	fn oauth2(&self) -> &dyn OAuth2Api {
		self
	}
}
impl IdApi for FakeSdk {
	fn initialize(&self, config: IdConfiguration) {
		self.0.lock().configurations.push(config);
	}

	fn prompt(&self, listener: Option<NotificationListener>) {
		self.0.lock().listeners.push(listener);
	}

	fn render_button(
		&self,
		parent: &ButtonParent,
		config: &ButtonConfig,
		_click_handler: Option<Callback<()>>,
	) {
		self.0.lock().buttons.push((parent.clone(), config.clone()));
	}

	fn disable_auto_select(&self) {
		self.0.lock().disable_auto_select_calls += 1;
	}

	fn cancel(&self) {
		self.0.lock().cancel_calls += 1;
	}

	fn revoke(&self, hint: &str, done: Option<Callback<()>>) {
		self.0.lock().revoked_hints.push(hint.to_owned());

		if let Some(done) = done {
			done.call(());
		}
	}
}
impl OAuth2Api for FakeSdk {
	fn init_token_client(&self, config: TokenClientConfig) -> Box<dyn TokenClient> {
		self.0.lock().token_clients.push(config);

		Box::new(FakeClient(self.0.clone()))
	}

	fn init_code_client(&self, config: CodeClientConfig) -> Box<dyn CodeClient> {
		self.0.lock().code_clients.push(config);

		Box::new(FakeClient(self.0.clone()))
	}

	fn has_granted_any_scope(&self, response: &TokenResponse, scopes: &[&str]) -> bool {
		response.scopes().any(|granted| scopes.contains(&granted))
	}

	fn has_granted_all_scopes(&self, response: &TokenResponse, scopes: &[&str]) -> bool {
		scopes.iter().all(|scope| response.scopes().any(|granted| granted == *scope))
	}

	fn revoke(&self, access_token: &str, done: Option<Callback<()>>) {
		self.0.lock().revoked_tokens.push(access_token.to_owned());

		if let Some(done) = done {
			done.call(());
		}
	}
}

#[derive(Default)]
struct FakeSdkInner {
	configurations: Vec<IdConfiguration>,
	listeners: Vec<Option<NotificationListener>>,
	buttons: Vec<(ButtonParent, ButtonConfig)>,
	disable_auto_select_calls: usize,
	cancel_calls: usize,
	revoked_hints: Vec<String>,
	revoked_tokens: Vec<String>,
	token_clients: Vec<TokenClientConfig>,
	code_clients: Vec<CodeClientConfig>,
	token_requests: usize,
	code_requests: usize,
}

struct FakeClient(Arc<Mutex<FakeSdkInner>>);
impl TokenClient for FakeClient {
	fn request_access_token(&self, _overrides: Option<OverridableTokenClientConfig>) {
		self.0.lock().token_requests += 1;
	}
}
impl CodeClient for FakeClient {
	fn request_code(&self) {
		self.0.lock().code_requests += 1;
	}
}

/// Script injector double that records injections and optionally completes them on the spot.
pub struct FakeInjector {
	auto_load: Option<SdkHandle>,
	injections: Mutex<Vec<(String, LoadSignal)>>,
}
impl FakeInjector {
	/// Injector that waits for [`FakeInjector::load`] or [`FakeInjector::fail`].
	pub fn manual() -> Arc<Self> {
		Arc::new(Self { auto_load: None, injections: Default::default() })
	}

	/// Injector that reports the SDK ready as soon as it is injected.
	pub fn immediate(sdk: SdkHandle) -> Arc<Self> {
		Arc::new(Self { auto_load: Some(sdk), injections: Default::default() })
	}

	/// Number of injections requested.
	pub fn injections(&self) -> usize {
		self.injections.lock().len()
	}

	/// Script URLs requested, in order.
	pub fn injected_urls(&self) -> Vec<String> {
		self.injections.lock().iter().map(|(url, _)| url.clone()).collect()
	}

	/// Reports every recorded injection as loaded.
	pub fn load(&self, sdk: SdkHandle) {
		for signal in self.signals() {
			signal.loaded(sdk.clone());
		}
	}

	/// Reports every recorded injection as failed.
	pub fn fail(&self, reason: &str) {
		for signal in self.signals() {
			signal.failed(reason);
		}
	}

	fn signals(&self) -> Vec<LoadSignal> {
		self.injections.lock().iter().map(|(_, signal)| signal.clone()).collect()
	}
}
impl ScriptInjector for FakeInjector {
	fn inject(&self, src: &str, signal: LoadSignal) {
		self.injections.lock().push((src.to_owned(), signal.clone()));

		if let Some(sdk) = &self.auto_load {
			signal.loaded(sdk.clone());
		}
	}
}

/// Builds a facade whose SDK loads as soon as it is requested.
pub fn build_test_auth() -> (GoogleAuth, FakeSdk) {
	let sdk = FakeSdk::default();
	let injector = FakeInjector::immediate(Arc::new(sdk.clone()));

	(GoogleAuth::with_loader(Loader::new(injector)), sdk)
}

/// Builds a facade whose SDK load is completed by hand through the returned injector.
pub fn build_pending_auth() -> (GoogleAuth, FakeSdk, Arc<FakeInjector>) {
	let sdk = FakeSdk::default();
	let injector = FakeInjector::manual();

	(GoogleAuth::with_loader(Loader::new(injector.clone())), sdk, injector)
}

/// Encodes `payload` as an unsigned compact token.
pub fn encode_test_token(payload: &serde_json::Value) -> String {
	let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
	let body = URL_SAFE_NO_PAD
		.encode(serde_json::to_vec(payload).expect("Token payload fixture should serialize."));

	format!("{header}.{body}.")
}

/// Yields to the executor until `condition` holds.
///
/// Panics after a bounded number of polls so a stuck flow fails the test instead of hanging it.
pub async fn wait_until(condition: impl Fn() -> bool) {
	for _ in 0..10_000 {
		if condition() {
			return;
		}

		YieldNow(false).await;
	}

	panic!("Condition never held while polling the pending flows.");
}

struct YieldNow(bool);
impl Future for YieldNow {
	type Output = ();

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		if self.0 {
			return Poll::Ready(());
		}

		self.0 = true;
		cx.waker().wake_by_ref();

		Poll::Pending
	}
}
