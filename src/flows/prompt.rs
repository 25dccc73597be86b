//! One-Tap prompt flow.
//!
//! A call initializes the SDK with a credential callback bound to a fresh settlement cell, then
//! opens the prompt with a notification listener bound to the same cell. A credential resolves
//! the call; a not-displayed or skipped moment rejects it. Dismissed moments only reach the
//! observer. Whichever producer settles first wins, so a credential arriving after a rejection
//! never reaches the caller's callback. Such credentials go to the installed callback instead,
//! since the call's configuration stays registered with the SDK.

// self
use crate::{
	_prelude::*,
	flows::{GoogleAuth, common},
	obs::{self, FlowKind},
	sdk::{
		CredentialCallback, CredentialResponse, NotificationListener, PromptContext,
		PromptNotification,
	},
	settle,
};

/// Per-call prompt configuration. Unset fields fall back to the installed options.
#[derive(Clone, Debug, Default)]
pub struct PromptOptions {
	/// Client id override; the installed default applies when absent or blank.
	pub client_id: Option<String>,
	/// Prompt wording.
	pub context: Option<PromptContext>,
	/// Automatic-login override.
	pub auto_login: Option<bool>,
	/// Cancel the prompt when the user clicks outside it.
	pub cancel_on_tap_outside: Option<bool>,
	/// Receives every moment notification of this prompt.
	pub on_notification: Option<NotificationListener>,
	/// Invoked with the credential that settles the call.
	pub callback: Option<CredentialCallback>,
}
impl PromptOptions {
	/// Overrides the client id for this call.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the prompt wording.
	pub fn with_context(mut self, context: PromptContext) -> Self {
		self.context = Some(context);

		self
	}

	/// Overrides the automatic-login flag.
	pub fn with_auto_login(mut self, auto_login: bool) -> Self {
		self.auto_login = Some(auto_login);

		self
	}

	/// Sets whether a click outside cancels the prompt.
	pub fn with_cancel_on_tap_outside(mut self, cancel: bool) -> Self {
		self.cancel_on_tap_outside = Some(cancel);

		self
	}

	/// Registers a moment observer.
	pub fn with_notification_listener(
		mut self,
		listener: impl 'static + Fn(PromptNotification) + Send + Sync,
	) -> Self {
		self.on_notification = Some(NotificationListener::new(listener));

		self
	}

	/// Registers the credential callback for this call.
	pub fn with_callback(
		mut self,
		callback: impl 'static + Fn(CredentialResponse) + Send + Sync,
	) -> Self {
		self.callback = Some(CredentialCallback::new(callback));

		self
	}
}

impl GoogleAuth {
	/// Opens the One-Tap prompt and resolves with the selected credential.
	///
	/// Rejects with [`Error::PromptNotDisplayed`] or [`Error::PromptSkipped`] when the SDK reports
	/// that moment first. The credential that settles the call reaches the per-call callback (or the
	/// installed one when the call has none). The prompt call replaces the SDK's id configuration,
	/// so credentials arriving after settlement, such as a later rendered-button sign-in, are
	/// forwarded to the installed callback instead.
	pub async fn open_prompt(&self, options: PromptOptions) -> Result<CredentialResponse> {
		common::observe(FlowKind::Prompt, "open_prompt", async move {
			let client_id = self.state.resolve_client_id(options.client_id.as_deref())?;
			let sdk = self.loader.ready().await?;
			let installed = self.state.current();
			let mut config = installed.id_configuration.clone().unwrap_or_default();
			let fallback = config.callback.clone().or_else(|| installed.callback.clone());
			let callback = options.callback.or_else(|| fallback.clone());
			let (settler, settlement) = settle::cell::<Result<CredentialResponse>>();
			let on_credential = settler.clone();
			let on_notification = options.on_notification;

			config.client_id = Some(client_id);
			config.auto_select =
				Some(options.auto_login.or(config.auto_select).unwrap_or(installed.auto_login));
			config.context = options.context.or(config.context);
			config.cancel_on_tap_outside =
				options.cancel_on_tap_outside.or(config.cancel_on_tap_outside);
			config.callback = Some(CredentialCallback::new(move |response| {
				if on_credential.settle(Ok(response.clone())) {
					return;
				}

				match &fallback {
					Some(fallback) => fallback.call(response),
					None => obs::record_discarded(FlowKind::Prompt, "late_credential"),
				}
			}));

			sdk.id().initialize(config);
			sdk.id().prompt(Some(NotificationListener::new(move |notification| {
				if let Some(listener) = &on_notification {
					listener.call(notification);
				}

				let rejection = if let Some(reason) = notification.not_displayed_reason() {
					Error::PromptNotDisplayed { reason }
				} else if let Some(reason) = notification.skipped_reason() {
					Error::PromptSkipped { reason }
				} else {
					return;
				};

				if !settler.settle(Err(rejection)) {
					obs::record_discarded(FlowKind::Prompt, "late_notification");
				}
			})));

			let response = settlement.await.map_err(|_| Error::Abandoned)??;

			if let Some(callback) = callback {
				callback.call(response.clone());
			}

			Ok(response)
		})
		.await
	}
}
