//! Install-time options and the shared snapshot every flow reads its defaults from.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	sdk::{ButtonConfig, CredentialCallback, CredentialResponse, IdConfiguration},
};

/// Popup flavor selected at install time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupType {
	/// Authorization-code popup.
	#[default]
	Code,
	/// Access-token popup.
	Token,
}

/// Options supplied at install time (the configuration surface).
///
/// Documents use the install surface's camelCase keys (`clientId`, `autoLogin`, ...). The
/// credential callback cannot be deserialized; attach it with [`AuthOptions::with_callback`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthOptions {
	/// OAuth client id used when a call site does not override it.
	pub client_id: Option<String>,
	/// Show the One-Tap prompt right after installation.
	pub prompt: bool,
	/// Default automatic-login (`auto_select`) flag.
	pub auto_login: bool,
	/// Popup flavor opened by [`crate::flows::GoogleAuth::login_popup`].
	pub popup_type: Option<PopupType>,
	/// Id configuration passed to `initialize` once the SDK is ready.
	pub id_configuration: Option<IdConfiguration>,
	/// Default button configuration.
	pub button_config: ButtonConfig,
	/// Default credential callback.
	#[serde(skip)]
	pub callback: Option<CredentialCallback>,
}
impl AuthOptions {
	/// Creates options for the provided client id.
	pub fn new(client_id: impl Into<String>) -> Self {
		Self { client_id: Some(client_id.into()), ..Default::default() }
	}

	/// Parses options from a JSON document, reporting the offending field path.
	pub fn from_json(document: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(document);

		serde_path_to_error::deserialize(&mut de).map_err(|err| ConfigError::Parse {
			path: err.path().to_string(),
			message: err.inner().to_string(),
		})
	}

	/// Enables or disables the post-install prompt.
	pub fn with_prompt(mut self, prompt: bool) -> Self {
		self.prompt = prompt;

		self
	}

	/// Sets the default automatic-login flag.
	pub fn with_auto_login(mut self, auto_login: bool) -> Self {
		self.auto_login = auto_login;

		self
	}

	/// Sets the popup flavor used by the rendered button.
	pub fn with_popup_type(mut self, popup_type: PopupType) -> Self {
		self.popup_type = Some(popup_type);

		self
	}

	/// Sets the id configuration passed to `initialize`.
	pub fn with_id_configuration(mut self, config: IdConfiguration) -> Self {
		self.id_configuration = Some(config);

		self
	}

	/// Sets the default button configuration.
	pub fn with_button_config(mut self, config: ButtonConfig) -> Self {
		self.button_config = config;

		self
	}

	/// Sets the default credential callback.
	pub fn with_callback(
		mut self,
		callback: impl 'static + Fn(CredentialResponse) + Send + Sync,
	) -> Self {
		self.callback = Some(CredentialCallback::new(callback));

		self
	}

	/// Effective default client id: the top-level value, else the id configuration's.
	pub fn client_id(&self) -> Option<&str> {
		self.client_id
			.as_deref()
			.or_else(|| self.id_configuration.as_ref()?.client_id.as_deref())
	}

	/// Validates client id consistency.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let nested = self.id_configuration.as_ref().and_then(|config| config.client_id.as_deref());

		for id in [self.client_id.as_deref(), nested].into_iter().flatten() {
			if id.trim().is_empty() {
				return Err(ConfigError::BlankClientId);
			}
		}

		if let (Some(options), Some(id_configuration)) = (self.client_id.as_deref(), nested)
			&& options != id_configuration
		{
			return Err(ConfigError::ConflictingClientId {
				options: options.to_owned(),
				id_configuration: id_configuration.to_owned(),
			});
		}

		Ok(())
	}
}

/// Shared holder of the latest [`AuthOptions`].
///
/// Writers replace the whole snapshot; readers clone an `Arc`, so no partial update is ever
/// visible.
#[derive(Debug, Default)]
pub struct AuthState(RwLock<Arc<AuthOptions>>);
impl AuthState {
	/// Replaces the stored options (last write wins).
	pub fn configure(&self, options: AuthOptions) {
		*self.0.write() = Arc::new(options);
	}

	/// Latest options snapshot.
	pub fn current(&self) -> Arc<AuthOptions> {
		self.0.read().clone()
	}

	/// Resolves the client id for a call: a non-blank override, else the stored default.
	pub fn resolve_client_id(&self, overridden: Option<&str>) -> Result<String, ConfigError> {
		if let Some(id) = overridden.filter(|id| !id.trim().is_empty()) {
			return Ok(id.to_owned());
		}

		self.current()
			.client_id()
			.filter(|id| !id.trim().is_empty())
			.map(str::to_owned)
			.ok_or(ConfigError::MissingClientId)
	}
}
