//! Awaitable flows over the SDK, powered by the [`GoogleAuth`] facade.

pub mod common;
pub mod popup;
pub mod prompt;

pub use popup::*;
pub use prompt::*;

// self
use crate::{
	_prelude::*,
	loader::{LibraryState, Loader, ScriptInjector},
	sdk::{ButtonConfig, ButtonParent, Callback, IdConfiguration, SdkHandle},
	settle,
	state::{AuthOptions, AuthState},
};

/// Entry point for every SDK interaction.
///
/// The facade owns the [`Loader`] and the [`AuthState`] snapshot. Clones share both, so keep one
/// instance per process and hand clones to call sites. Each popup or prompt call creates its own
/// settlement cell; concurrent calls never observe each other's results.
#[derive(Clone, Debug)]
pub struct GoogleAuth {
	/// SDK loader shared by every flow.
	pub loader: Loader,
	/// Install-time options consulted when a call omits an override.
	pub state: Arc<AuthState>,
}
impl GoogleAuth {
	/// Creates a facade that loads the default SDK script through `injector`.
	pub fn new(injector: Arc<dyn ScriptInjector>) -> Self {
		Self::with_loader(Loader::new(injector))
	}

	/// Creates a facade around an existing loader.
	pub fn with_loader(loader: Loader) -> Self {
		Self { loader, state: Default::default() }
	}

	/// Validates and stores `options` without touching the SDK.
	pub fn configure(&self, options: AuthOptions) -> Result<()> {
		options.validate()?;
		self.state.configure(options);

		Ok(())
	}

	/// Stores `options`, requests the SDK, and initializes it once ready.
	///
	/// Initialization passes the stored id configuration, filled in with the client id, the
	/// automatic-login flag, and the credential callback. When `options.prompt` is set the
	/// One-Tap prompt opens right after.
	///
	/// Rejects with [`Error::Load`] once the SDK failed to load; the options are not stored then.
	pub fn install(&self, options: AuthOptions) -> Result<()> {
		options.validate()?;

		if let Some(err) = self.loader.failure() {
			return Err(err.into());
		}

		self.state.configure(options);

		let snapshot = self.state.current();

		self.loader.ensure_loaded(move |sdk| {
			sdk.id().initialize(install_configuration(&snapshot));

			if snapshot.prompt {
				sdk.id().prompt(None);
			}
		});

		Ok(())
	}

	/// Returns true once the SDK is ready.
	pub fn library_loaded(&self) -> bool {
		self.loader.is_loaded()
	}

	/// Current readiness flags.
	pub fn library_state(&self) -> LibraryState {
		self.loader.state()
	}

	/// Waits until the SDK is ready, requesting it if needed.
	pub async fn wait_library_loaded(&self) -> Result<()> {
		self.loader.ready().await.map(|_| ())
	}

	/// Runs `action` with the SDK once it is ready.
	pub fn with_sdk(&self, action: impl 'static + FnOnce(SdkHandle) + Send) {
		self.loader.ensure_loaded(action);
	}

	/// Renders the sign-in button into `parent` once the SDK is ready.
	///
	/// `overrides` replaces the installed button configuration when present.
	pub fn render_button(
		&self,
		parent: ButtonParent,
		overrides: Option<ButtonConfig>,
		click_handler: Option<Callback<()>>,
	) {
		let config = overrides.unwrap_or_else(|| self.state.current().button_config.clone());

		self.loader.ensure_loaded(move |sdk| {
			sdk.id().render_button(&parent, &config, click_handler);
		});
	}

	/// Disables automatic account selection so the next prompt asks again.
	pub fn logout(&self) {
		self.loader.ensure_loaded(|sdk| sdk.id().disable_auto_select());
	}

	/// Cancels an open One-Tap prompt.
	///
	/// A pending [`GoogleAuth::open_prompt`] call is not forced to settle; the SDK reports a
	/// `cancel_called` dismissal, which never settles a call.
	pub fn cancel_prompt(&self) {
		self.loader.ensure_loaded(|sdk| sdk.id().cancel());
	}

	/// Revokes the ID-token grant for `hint` (email or `sub`) and waits for the SDK to confirm.
	pub async fn revoke(&self, hint: impl Into<String>) -> Result<()> {
		let hint = hint.into();
		let sdk = self.loader.ready().await?;
		let (settler, settlement) = settle::cell();

		sdk.id().revoke(
			&hint,
			Some(Callback::new(move |()| {
				settler.settle(());
			})),
		);

		settlement.await.map_err(|_| Error::Abandoned)
	}
}

fn install_configuration(options: &AuthOptions) -> IdConfiguration {
	let mut config = options.id_configuration.clone().unwrap_or_default();

	config.client_id = options.client_id().map(str::to_owned);
	config.auto_select = config.auto_select.or(Some(options.auto_login));

	if config.callback.is_none() {
		config.callback = options.callback.clone();
	}

	config
}
