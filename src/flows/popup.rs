//! Popup authorization flows: authorization codes and access tokens.
//!
//! Every call creates a transient SDK client whose callback holds a fresh settlement cell. The
//! first response routed to that client settles the call; duplicates are discarded. Responses
//! carrying an OAuth `error` resolve as values, matching what the SDK reports. Call
//! [`TokenResponse::into_result`] or [`CodeResponse::into_result`] to turn them into
//! [`Error::Popup`].

// std
use std::marker::PhantomData;
// self
use crate::{
	_prelude::*,
	flows::{GoogleAuth, common},
	obs::{self, FlowKind},
	sdk::{
		Callback, CodeClient, CodeClientConfig, CodeResponse, ConsentPrompt, IdentitySdk,
		TokenClient, TokenClientConfig, TokenResponse, UxMode,
	},
	settle,
	state::PopupType,
};

/// Popup flavor driven by [`GoogleAuth::open_popup`].
pub trait PopupFlow
where
	Self: 'static + Send + Sync,
{
	/// Response handed to the client callback.
	type Response: 'static + Clone + Debug + Send;
	/// Transient SDK client kept alive until the call settles.
	type Client: Send;

	/// Observability label.
	const KIND: FlowKind;

	/// Creates the client and opens the popup.
	fn launch(
		sdk: &dyn IdentitySdk,
		request: PopupRequest,
		callback: Callback<Self::Response>,
	) -> Self::Client;

	/// `state` echoed by `response`, if any.
	fn echoed_state(response: &Self::Response) -> Option<&str>;
}

/// Authorization-code popup (`initCodeClient` + `requestCode`).
#[derive(Clone, Copy, Debug, Default)]
pub struct CodeFlow;
impl PopupFlow for CodeFlow {
	type Client = Box<dyn CodeClient>;
	type Response = CodeResponse;

	const KIND: FlowKind = FlowKind::CodePopup;

	fn launch(
		sdk: &dyn IdentitySdk,
		request: PopupRequest,
		callback: Callback<CodeResponse>,
	) -> Self::Client {
		let client = sdk.oauth2().init_code_client(CodeClientConfig {
			client_id: request.client_id,
			scope: request.scope,
			redirect_uri: None,
			callback: Some(callback),
			state: Some(request.state),
			enable_serial_consent: request.enable_serial_consent,
			hint: request.hint,
			hosted_domain: request.hosted_domain,
			ux_mode: Some(UxMode::Popup),
			select_account: request.select_account,
		});

		client.request_code();

		client
	}

	fn echoed_state(response: &CodeResponse) -> Option<&str> {
		response.state.as_deref()
	}
}

/// Access-token popup (`initTokenClient` + `requestAccessToken`).
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenFlow;
impl PopupFlow for TokenFlow {
	type Client = Box<dyn TokenClient>;
	type Response = TokenResponse;

	const KIND: FlowKind = FlowKind::TokenPopup;

	fn launch(
		sdk: &dyn IdentitySdk,
		request: PopupRequest,
		callback: Callback<TokenResponse>,
	) -> Self::Client {
		let client = sdk.oauth2().init_token_client(TokenClientConfig {
			client_id: request.client_id,
			scope: request.scope,
			callback: Some(callback),
			prompt: request.prompt,
			enable_serial_consent: request.enable_serial_consent,
			hint: request.hint,
			hosted_domain: request.hosted_domain,
			state: Some(request.state),
		});

		client.request_access_token(None);

		client
	}

	fn echoed_state(response: &TokenResponse) -> Option<&str> {
		response.state.as_deref()
	}
}

/// Resolved parameters handed to [`PopupFlow::launch`].
#[derive(Clone, Debug)]
pub struct PopupRequest {
	/// Effective client id.
	pub client_id: String,
	/// Space-delimited scopes.
	pub scope: String,
	/// Opaque state the response must echo.
	pub state: String,
	/// Consent prompt (token flow only).
	pub prompt: Option<ConsentPrompt>,
	/// Force account selection (code flow only).
	pub select_account: Option<bool>,
	/// Granular permissions toggle for legacy clients.
	pub enable_serial_consent: Option<bool>,
	/// Email hint for the target user.
	pub hint: Option<String>,
	/// Workspace domain hint.
	pub hosted_domain: Option<String>,
}

/// Per-call popup configuration.
pub struct LoginConfig<F>
where
	F: PopupFlow,
{
	/// Client id override; the installed default applies when absent or blank.
	pub client_id: Option<String>,
	/// Requested scopes; [`common::DEFAULT_SCOPE`] applies when empty.
	pub scopes: Vec<String>,
	/// Explicit request state; a random value is generated when absent.
	pub state: Option<String>,
	/// Consent prompt (token flow only).
	pub prompt: Option<ConsentPrompt>,
	/// Force account selection (code flow only).
	pub select_account: Option<bool>,
	/// Granular permissions toggle for legacy clients.
	pub enable_serial_consent: Option<bool>,
	/// Email hint for the target user.
	pub hint: Option<String>,
	/// Workspace domain hint.
	pub hosted_domain: Option<String>,
	/// Invoked with the response that settles the call.
	pub callback: Option<Callback<F::Response>>,
	_flow: PhantomData<F>,
}
impl<F> LoginConfig<F>
where
	F: PopupFlow,
{
	/// Creates an empty configuration that relies on installed defaults.
	pub fn new() -> Self {
		Self {
			client_id: None,
			scopes: Vec::new(),
			state: None,
			prompt: None,
			select_account: None,
			enable_serial_consent: None,
			hint: None,
			hosted_domain: None,
			callback: None,
			_flow: PhantomData,
		}
	}

	/// Overrides the client id for this call.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Replaces the requested scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Pins the request state instead of generating one.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Sets the consent prompt (token flow only).
	pub fn with_prompt(mut self, prompt: ConsentPrompt) -> Self {
		self.prompt = Some(prompt);

		self
	}

	/// Forces account selection (code flow only).
	pub fn with_select_account(mut self, select_account: bool) -> Self {
		self.select_account = Some(select_account);

		self
	}

	/// Sets the granular permissions toggle.
	pub fn with_enable_serial_consent(mut self, enabled: bool) -> Self {
		self.enable_serial_consent = Some(enabled);

		self
	}

	/// Sets the email hint.
	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = Some(hint.into());

		self
	}

	/// Sets the workspace domain hint.
	pub fn with_hosted_domain(mut self, domain: impl Into<String>) -> Self {
		self.hosted_domain = Some(domain.into());

		self
	}

	/// Registers a callback invoked with the settling response.
	pub fn with_callback(mut self, callback: impl 'static + Fn(F::Response) + Send + Sync) -> Self {
		self.callback = Some(Callback::new(callback));

		self
	}

	fn into_request(self, client_id: String) -> (PopupRequest, Option<Callback<F::Response>>) {
		let request = PopupRequest {
			client_id,
			scope: common::format_scope(&self.scopes[..]),
			state: self.state.unwrap_or_else(common::random_state),
			prompt: self.prompt,
			select_account: self.select_account,
			enable_serial_consent: self.enable_serial_consent,
			hint: self.hint,
			hosted_domain: self.hosted_domain,
		};

		(request, self.callback)
	}
}
impl<F> Clone for LoginConfig<F>
where
	F: PopupFlow,
{
	fn clone(&self) -> Self {
		Self {
			client_id: self.client_id.clone(),
			scopes: self.scopes.clone(),
			state: self.state.clone(),
			prompt: self.prompt,
			select_account: self.select_account,
			enable_serial_consent: self.enable_serial_consent,
			hint: self.hint.clone(),
			hosted_domain: self.hosted_domain.clone(),
			callback: self.callback.clone(),
			_flow: PhantomData,
		}
	}
}
impl<F> Default for LoginConfig<F>
where
	F: PopupFlow,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<F> Debug for LoginConfig<F>
where
	F: PopupFlow,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginConfig")
			.field("flow", &F::KIND)
			.field("client_id", &self.client_id)
			.field("scopes", &self.scopes)
			.field("state", &self.state)
			.field("prompt", &self.prompt)
			.field("select_account", &self.select_account)
			.field("hint", &self.hint)
			.field("hosted_domain", &self.hosted_domain)
			.field("callback", &self.callback.is_some())
			.finish()
	}
}

/// Code popup configuration.
pub type CodeLoginConfig = LoginConfig<CodeFlow>;
/// Token popup configuration.
pub type TokenLoginConfig = LoginConfig<TokenFlow>;

/// Response of [`GoogleAuth::login_popup`], tagged by the installed popup flavor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopupResponse {
	/// Authorization-code popup response.
	Code(CodeResponse),
	/// Access-token popup response.
	Token(TokenResponse),
}

impl GoogleAuth {
	/// Opens a popup and resolves with the first response routed to this call.
	///
	/// Fails with [`crate::error::ConfigError::MissingClientId`] before loading anything when no
	/// client id is configured, and with [`Error::StateMismatch`] when the response echoes a
	/// different `state`.
	pub async fn open_popup<F>(&self, config: LoginConfig<F>) -> Result<F::Response>
	where
		F: PopupFlow,
	{
		common::observe(F::KIND, "open_popup", async move {
			let client_id = self.state.resolve_client_id(config.client_id.as_deref())?;
			let sdk = self.loader.ready().await?;
			let (request, callback) = config.into_request(client_id);
			let expected = request.state.clone();
			let (settler, settlement) = settle::cell();
			let on_response = Callback::new(move |response: F::Response| {
				if !settler.settle(response) {
					obs::record_discarded(F::KIND, "duplicate_response");
				}
			});
			let client = F::launch(sdk.as_ref(), request, on_response);
			let response = settlement.await.map_err(|_| Error::Abandoned)?;

			drop(client);

			if let Some(returned) = F::echoed_state(&response)
				&& returned != expected
			{
				return Err(Error::StateMismatch { expected, returned: returned.to_owned() });
			}
			if let Some(callback) = callback {
				callback.call(response.clone());
			}

			Ok(response)
		})
		.await
	}

	/// Opens the authorization-code popup.
	pub async fn open_code_popup(&self, config: CodeLoginConfig) -> Result<CodeResponse> {
		self.open_popup(config).await
	}

	/// Opens the access-token popup.
	pub async fn open_token_popup(&self, config: TokenLoginConfig) -> Result<TokenResponse> {
		self.open_popup(config).await
	}

	/// Opens the popup flavor selected by the installed `popup_type`, using installed defaults only.
	pub async fn login_popup(&self) -> Result<PopupResponse> {
		match self.state.current().popup_type.unwrap_or_default() {
			PopupType::Code =>
				self.open_code_popup(CodeLoginConfig::new()).await.map(PopupResponse::Code),
			PopupType::Token =>
				self.open_token_popup(TokenLoginConfig::new()).await.map(PopupResponse::Token),
		}
	}

	/// Returns true when `response` grants every one of `scopes`.
	pub async fn has_granted_all_scopes(
		&self,
		response: &TokenResponse,
		scopes: &[&str],
	) -> Result<bool> {
		let sdk = self.loader.ready().await?;

		Ok(sdk.oauth2().has_granted_all_scopes(response, scopes))
	}

	/// Returns true when `response` grants at least one of `scopes`.
	pub async fn has_granted_any_scope(
		&self,
		response: &TokenResponse,
		scopes: &[&str],
	) -> Result<bool> {
		let sdk = self.loader.ready().await?;

		Ok(sdk.oauth2().has_granted_any_scope(response, scopes))
	}

	/// Revokes `access_token` and waits for the SDK to confirm.
	pub async fn revoke_access_token(&self, access_token: &str) -> Result<()> {
		let sdk = self.loader.ready().await?;
		let (settler, settlement) = settle::cell();

		sdk.oauth2().revoke(
			access_token,
			Some(Callback::new(move |()| {
				settler.settle(());
			})),
		);

		settlement.await.map_err(|_| Error::Abandoned)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn login_config_resolves_request() {
		let config = TokenLoginConfig::new()
			.with_scopes(["email", "email", "profile"])
			.with_prompt(ConsentPrompt::Consent)
			.with_hint("ada@example.com");
		let (request, callback) = config.into_request("client".into());

		assert_eq!(request.client_id, "client");
		assert_eq!(request.scope, "email profile");
		assert_eq!(request.state.len(), 32);
		assert_eq!(request.prompt, Some(ConsentPrompt::Consent));
		assert_eq!(request.hint.as_deref(), Some("ada@example.com"));
		assert!(callback.is_none());

		let (pinned, _) = CodeLoginConfig::new().with_state("fixed").into_request("client".into());

		assert_eq!(pinned.state, "fixed");
		assert_eq!(pinned.scope, common::DEFAULT_SCOPE);
	}

	#[test]
	fn debug_hides_callback_body() {
		let config = CodeLoginConfig::new().with_callback(|_| {});
		let rendered = format!("{config:?}");

		assert!(rendered.contains("CodePopup"));
		assert!(rendered.contains("callback: true"));
	}
}
