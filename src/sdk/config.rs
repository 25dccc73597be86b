//! Configuration records accepted by the SDK.
//!
//! Field names follow the SDK (`client_id`, `auto_select`, ...). Records deserialize from
//! configuration documents; callback fields are skipped and must be attached in code.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{
	_prelude::*,
	sdk::{Callback, CodeResponse, CredentialCallback, TokenResponse},
};

wire_enum! {
	/// Title and wording of the One-Tap prompt.
	PromptContext, "context" {
		/// "Sign in with Google".
		Signin => "signin",
		/// "Sign up with Google".
		Signup => "signup",
		/// "Use with Google".
		Use => "use",
	}
}

wire_enum! {
	/// UX flow of the sign-in button or code client.
	UxMode, "ux_mode" {
		/// Popup window.
		Popup => "popup",
		/// Full-page redirect.
		Redirect => "redirect",
	}
}

wire_enum! {
	/// Consent prompt requested from a token client.
	ConsentPrompt, "prompt" {
		/// Let the SDK decide.
		Unspecified => "",
		/// No prompt.
		NoPrompt => "none",
		/// Always ask for consent.
		Consent => "consent",
		/// Always ask for an account.
		SelectAccount => "select_account",
	}
}

wire_enum! {
	/// Button type.
	ButtonType, "button type" {
		/// Button with text.
		Standard => "standard",
		/// Icon-only button.
		Icon => "icon",
	}
}

wire_enum! {
	/// Button theme.
	ButtonTheme, "button theme" {
		/// Outlined.
		Outline => "outline",
		/// Filled blue.
		FilledBlue => "filled_blue",
		/// Filled black.
		FilledBlack => "filled_black",
	}
}

wire_enum! {
	/// Button size.
	ButtonSize, "button size" {
		/// Large.
		Large => "large",
		/// Medium.
		Medium => "medium",
		/// Small.
		Small => "small",
	}
}

wire_enum! {
	/// Button text.
	ButtonText, "button text" {
		/// "Sign in with Google".
		SigninWith => "signin_with",
		/// "Sign up with Google".
		SignupWith => "signup_with",
		/// "Continue with Google".
		ContinueWith => "continue_with",
		/// "Sign in".
		Signin => "signin",
	}
}

wire_enum! {
	/// Button shape.
	ButtonShape, "button shape" {
		/// Rectangular.
		Rectangular => "rectangular",
		/// Pill.
		Pill => "pill",
		/// Circle.
		Circle => "circle",
		/// Square.
		Square => "square",
	}
}

wire_enum! {
	/// Google logo alignment.
	LogoAlignment, "logo alignment" {
		/// Left.
		Left => "left",
		/// Center.
		Center => "center",
	}
}

/// Visual configuration of the rendered sign-in button.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
	/// Button type.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<ButtonType>,
	/// Button theme.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub theme: Option<ButtonTheme>,
	/// Button size.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub size: Option<ButtonSize>,
	/// Button text.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub text: Option<ButtonText>,
	/// Button shape.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shape: Option<ButtonShape>,
	/// Logo alignment.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logo_alignment: Option<LogoAlignment>,
	/// Width in pixels.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub width: Option<String>,
	/// Button language.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
}

/// Username/password pair delivered to the native credential callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCredential {
	/// Username.
	pub id: String,
	/// Password.
	pub password: crate::sdk::Secret,
}

/// `google.accounts.id.initialize` configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdConfiguration {
	/// OAuth client id.
	pub client_id: Option<String>,
	/// Enables automatic selection in One-Tap.
	pub auto_select: Option<bool>,
	/// ID-token callback.
	#[serde(skip)]
	pub callback: Option<CredentialCallback>,
	/// Button UX flow.
	pub ux_mode: Option<UxMode>,
	/// Login endpoint for the redirect flow.
	pub login_uri: Option<Url>,
	/// Password credential handler endpoint.
	pub native_login_uri: Option<Url>,
	/// Password credential handler.
	#[serde(skip)]
	pub native_callback: Option<Callback<NativeCredential>>,
	/// Cancel the prompt when the user clicks outside it.
	pub cancel_on_tap_outside: Option<bool>,
	/// DOM id of the prompt container.
	pub prompt_parent_id: Option<String>,
	/// Nonce embedded in issued ID tokens.
	pub nonce: Option<String>,
	/// Prompt wording.
	pub context: Option<PromptContext>,
	/// Parent domain for the shared state cookie.
	pub state_cookie_domain: Option<String>,
	/// Origins allowed to embed the intermediate iframe.
	#[serde(deserialize_with = "one_or_many")]
	pub allowed_parent_origin: Option<Vec<String>>,
	/// Called when the user closes the intermediate iframe.
	#[serde(skip)]
	pub intermediate_iframe_close_callback: Option<Callback<()>>,
	/// Upgraded One-Tap UX on ITP browsers.
	pub itp_support: Option<bool>,
	/// Workspace domain hint.
	pub hosted_domain: Option<String>,
}

/// `google.accounts.oauth2.initTokenClient` configuration.
#[derive(Clone, Debug)]
pub struct TokenClientConfig {
	/// OAuth client id.
	pub client_id: String,
	/// Space-delimited scopes.
	pub scope: String,
	/// Response callback.
	pub callback: Option<Callback<TokenResponse>>,
	/// Consent prompt.
	pub prompt: Option<ConsentPrompt>,
	/// Granular permissions toggle for legacy clients.
	pub enable_serial_consent: Option<bool>,
	/// Email hint for the target user.
	pub hint: Option<String>,
	/// Workspace domain hint.
	pub hosted_domain: Option<String>,
	/// Opaque request state.
	pub state: Option<String>,
}

/// Per-request overrides for [`crate::sdk::TokenClient::request_access_token`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverridableTokenClientConfig {
	/// Consent prompt.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub prompt: Option<ConsentPrompt>,
	/// Granular permissions toggle for legacy clients.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enable_serial_consent: Option<bool>,
	/// Email hint for the target user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hint: Option<String>,
	/// Opaque request state.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
}

/// `google.accounts.oauth2.initCodeClient` configuration.
#[derive(Clone, Debug)]
pub struct CodeClientConfig {
	/// OAuth client id.
	pub client_id: String,
	/// Space-delimited scopes.
	pub scope: String,
	/// Redirect target for the redirect UX.
	pub redirect_uri: Option<Url>,
	/// Response callback for the popup UX.
	pub callback: Option<Callback<CodeResponse>>,
	/// Opaque request state.
	pub state: Option<String>,
	/// Granular permissions toggle for legacy clients.
	pub enable_serial_consent: Option<bool>,
	/// Email hint for the target user.
	pub hint: Option<String>,
	/// Workspace domain hint.
	pub hosted_domain: Option<String>,
	/// Popup or redirect.
	pub ux_mode: Option<UxMode>,
	/// Ask the user to pick an account.
	pub select_account: Option<bool>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum OneOrMany {
		One(String),
		Many(Vec<String>),
	}

	match Option::<OneOrMany>::deserialize(deserializer)? {
		None => Ok(None),
		Some(OneOrMany::One(origin)) if origin.is_empty() =>
			Err(D::Error::custom("allowed_parent_origin cannot be empty")),
		Some(OneOrMany::One(origin)) => Ok(Some(vec![origin])),
		Some(OneOrMany::Many(origins)) => Ok(Some(origins)),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn id_configuration_reads_sdk_document() {
		let config: IdConfiguration = serde_json::from_str(
			r#"{
				"client_id": "abc.apps.googleusercontent.com",
				"auto_select": true,
				"context": "use",
				"login_uri": "https://example.com/login",
				"allowed_parent_origin": "https://example.com"
			}"#,
		)
		.expect("Id configuration should deserialize.");

		assert_eq!(config.client_id.as_deref(), Some("abc.apps.googleusercontent.com"));
		assert_eq!(config.auto_select, Some(true));
		assert_eq!(config.context, Some(PromptContext::Use));
		assert_eq!(config.allowed_parent_origin, Some(vec!["https://example.com".into()]));
		assert!(config.callback.is_none());

		let many: IdConfiguration =
			serde_json::from_str(r#"{"allowed_parent_origin":["https://a.test","https://b.test"]}"#)
				.expect("Origin list should deserialize.");

		assert_eq!(many.allowed_parent_origin.map(|o| o.len()), Some(2));
		assert!(serde_json::from_str::<IdConfiguration>(r#"{"allowed_parent_origin":""}"#).is_err());
	}

	#[test]
	fn button_config_uses_type_key() {
		let config: ButtonConfig =
			serde_json::from_str(r#"{"type":"icon","theme":"filled_black","shape":"circle"}"#)
				.expect("Button config should deserialize.");

		assert_eq!(config.kind, Some(ButtonType::Icon));
		assert_eq!(config.theme, Some(ButtonTheme::FilledBlack));
		assert_eq!(
			serde_json::to_string(&config).expect("Button config should serialize."),
			r#"{"type":"icon","theme":"filled_black","shape":"circle"}"#
		);
	}

	#[test]
	fn consent_prompt_keeps_empty_wire_value() {
		assert_eq!("".parse::<ConsentPrompt>(), Ok(ConsentPrompt::Unspecified));
		assert_eq!(ConsentPrompt::SelectAccount.to_string(), "select_account");
	}
}
