//! Consumer-side contract for the Google Identity Services SDK.
//!
//! The SDK is a browser-global object exposing `accounts.id` (sign-in, One-Tap) and
//! `accounts.oauth2` (popup token/code clients). This module mirrors that surface as traits so a
//! browser binding can implement it while the bridge logic stays testable with in-process fakes.
//! Wire records (`config`, `response`, `notification`) keep the SDK's field names.

// Closed SDK enumerations: exact wire strings, serde, `Display`, and `FromStr`.
macro_rules! wire_enum {
	(
		$(#[$meta:meta])*
		$name:ident, $kind:literal {
			$($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
		pub enum $name {
			$($(#[$vmeta])* #[serde(rename = $wire)] $variant,)+
		}
		impl $name {
			/// Every variant, in declaration order.
			pub const ALL: &'static [Self] = &[$(Self::$variant),+];

			/// Returns the exact wire string used by the SDK.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => $wire,)+
				}
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
		impl FromStr for $name {
			type Err = $crate::sdk::UnknownWireValue;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($wire => Ok(Self::$variant),)+
					_ => Err($crate::sdk::UnknownWireValue { kind: $kind, value: s.to_owned() }),
				}
			}
		}
	};
}

pub mod config;
pub mod notification;
pub mod response;
pub mod secret;

pub use config::*;
pub use notification::*;
pub use response::*;
pub use secret::*;

// self
use crate::_prelude::*;

/// Raised when an SDK string falls outside its closed enumeration.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown {kind} value `{value}`.")]
pub struct UnknownWireValue {
	/// Enumeration name.
	pub kind: &'static str,
	/// Offending string.
	pub value: String,
}

/// Shared handle to the loaded SDK.
pub type SdkHandle = Arc<dyn IdentitySdk>;

/// Root of the SDK surface (`google.accounts`).
pub trait IdentitySdk
where
	Self: Send + Sync,
{
	/// `google.accounts.id`.
	fn id(&self) -> &dyn IdApi;

	/// `google.accounts.oauth2`.
	fn oauth2(&self) -> &dyn OAuth2Api;
}

/// Sign-in and One-Tap surface (`google.accounts.id`).
pub trait IdApi
where
	Self: Send + Sync,
{
	/// Replaces the SDK's process-wide id configuration.
	fn initialize(&self, config: IdConfiguration);

	/// Shows the One-Tap prompt; `listener` receives every moment notification.
	fn prompt(&self, listener: Option<NotificationListener>);

	/// Renders the sign-in button into `parent`.
	fn render_button(
		&self,
		parent: &ButtonParent,
		config: &ButtonConfig,
		click_handler: Option<Callback<()>>,
	);

	/// Stops automatic account selection for the next prompt.
	fn disable_auto_select(&self);

	/// Cancels an open prompt.
	fn cancel(&self);

	/// Revokes the OAuth grant used to share the ID token for `hint` (email or `sub`).
	fn revoke(&self, hint: &str, done: Option<Callback<()>>);
}

/// Popup authorization surface (`google.accounts.oauth2`).
pub trait OAuth2Api
where
	Self: Send + Sync,
{
	/// Creates a token client bound to `config.callback`.
	fn init_token_client(&self, config: TokenClientConfig) -> Box<dyn TokenClient>;

	/// Creates a code client bound to `config.callback`.
	fn init_code_client(&self, config: CodeClientConfig) -> Box<dyn CodeClient>;

	/// Returns true when `response` grants at least one of `scopes`.
	fn has_granted_any_scope(&self, response: &TokenResponse, scopes: &[&str]) -> bool;

	/// Returns true when `response` grants every one of `scopes`.
	fn has_granted_all_scopes(&self, response: &TokenResponse, scopes: &[&str]) -> bool;

	/// Revokes an access token.
	fn revoke(&self, access_token: &str, done: Option<Callback<()>>);
}

/// Client returned by [`OAuth2Api::init_token_client`].
pub trait TokenClient
where
	Self: Send,
{
	/// Opens the token popup.
	fn request_access_token(&self, overrides: Option<OverridableTokenClientConfig>);
}

/// Client returned by [`OAuth2Api::init_code_client`].
pub trait CodeClient
where
	Self: Send,
{
	/// Opens the code popup.
	fn request_code(&self);
}

/// Shared, repeatable callback handed to the SDK.
///
/// The SDK may invoke a callback any number of times, so the closure is `Fn`, not `FnOnce`.
pub struct Callback<T>(Arc<dyn Fn(T) + Send + Sync>);
impl<T> Callback<T> {
	/// Wraps a closure.
	pub fn new(f: impl 'static + Fn(T) + Send + Sync) -> Self {
		Self(Arc::new(f))
	}

	/// Invokes the closure.
	pub fn call(&self, value: T) {
		(self.0)(value)
	}
}
impl<T> Clone for Callback<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}
impl<T> Debug for Callback<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Callback(..)")
	}
}

/// Receives One-Tap moment notifications.
pub type NotificationListener = Callback<PromptNotification>;
/// Receives credentials from the id configuration.
pub type CredentialCallback = Callback<CredentialResponse>;

/// Mount point for a rendered button, identified by its element id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ButtonParent(String);
impl ButtonParent {
	/// Names the element the SDK renders into.
	pub fn new(element_id: impl Into<String>) -> Self {
		Self(element_id.into())
	}

	/// Element id of the mount point.
	pub fn element_id(&self) -> &str {
		&self.0
	}
}
