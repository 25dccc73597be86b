//! Response records delivered by SDK callbacks. They pass through the bridge unmodified.

// self
use crate::{
	_prelude::*,
	jwt::{self, GoogleIdClaims},
	sdk::Secret,
};

wire_enum! {
	/// How a credential was selected.
	SelectBy, "select_by" {
		/// Automatic sign-in.
		Auto => "auto",
		/// One-Tap with an existing session.
		User => "user",
		/// One-Tap, single tap.
		User1Tap => "user_1tap",
		/// One-Tap, two taps.
		User2Tap => "user_2tap",
		/// Sign-in button.
		Btn => "btn",
		/// Sign-in button with confirmation.
		BtnConfirm => "btn_confirm",
		/// Sign-in button adding a session. The SDK spells it this way.
		BrnAddSession => "brn_add_session",
		/// Sign-in button with confirmation adding a session.
		BtnConfirmAddSession => "btn_confirm_add_session",
	}
}

/// Credential delivered to the id configuration callback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialResponse {
	/// Client id the credential was issued for.
	#[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	/// Compact JWT ID token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credential: Option<Secret>,
	/// How the credential was selected.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub select_by: Option<SelectBy>,
}
impl CredentialResponse {
	/// Decodes the ID-token payload of [`Self::credential`].
	pub fn claims(&self) -> Result<Option<GoogleIdClaims>> {
		self.credential
			.as_ref()
			.map(|credential| jwt::decode_as(credential.expose()).map_err(Error::from))
			.transpose()
	}
}

/// Response handed to a token client callback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
	/// Access token of a successful response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub access_token: Option<Secret>,
	/// Signed-in user index.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authuser: Option<String>,
	/// Lifetime of the access token, in seconds.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<String>,
	/// Prompt type presented to the user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub prompt: Option<String>,
	/// Space-delimited scopes approved by the user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Type of the issued token.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
	/// Echo of the request `state`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// OAuth error code of a failed response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Human-readable error description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_description: Option<String>,
	/// Error documentation link.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_uri: Option<String>,
}
impl TokenResponse {
	/// Iterates over the granted scopes.
	pub fn scopes(&self) -> impl Iterator<Item = &str> {
		self.scope.as_deref().unwrap_or_default().split_whitespace()
	}

	/// Lifetime of the access token, when it parses as whole seconds.
	pub fn expires_in_seconds(&self) -> Option<u64> {
		self.expires_in.as_deref()?.trim().parse().ok()
	}

	/// Converts an OAuth error response into [`Error::Popup`].
	pub fn into_result(self) -> Result<Self> {
		match self.error {
			Some(error) => Err(Error::Popup { error, description: self.error_description }),
			None => Ok(self),
		}
	}
}

/// Response handed to a code client callback.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeResponse {
	/// Signed-in user index.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authuser: Option<String>,
	/// Authorization code of a successful response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<Secret>,
	/// Prompt type presented to the user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub prompt: Option<String>,
	/// Space-delimited scopes approved by the user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	/// Echo of the request `state`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// OAuth error code of a failed response.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Human-readable error description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_description: Option<String>,
	/// Error documentation link.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_uri: Option<String>,
}
impl CodeResponse {
	/// Converts an OAuth error response into [`Error::Popup`].
	pub fn into_result(self) -> Result<Self> {
		match self.error {
			Some(error) => Err(Error::Popup { error, description: self.error_description }),
			None => Ok(self),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn credential_response_uses_sdk_field_names() {
		let response: CredentialResponse = serde_json::from_str(
			r#"{"clientId":"abc.apps.googleusercontent.com","credential":"a.b.c","select_by":"brn_add_session"}"#,
		)
		.expect("Credential response should deserialize.");

		assert_eq!(response.client_id.as_deref(), Some("abc.apps.googleusercontent.com"));
		assert_eq!(response.select_by, Some(SelectBy::BrnAddSession));
		assert!(!format!("{response:?}").contains("a.b.c"));
	}

	#[test]
	fn token_response_helpers() {
		let response: TokenResponse = serde_json::from_str(
			r#"{"access_token":"ya29","expires_in":"3599","scope":"email  profile","token_type":"Bearer"}"#,
		)
		.expect("Token response should deserialize.");

		assert_eq!(response.scopes().collect::<Vec<_>>(), ["email", "profile"]);
		assert_eq!(response.expires_in_seconds(), Some(3599));
		assert!(response.into_result().is_ok());

		let failed = TokenResponse {
			error: Some("access_denied".into()),
			error_description: Some("user said no".into()),
			..Default::default()
		};
		let err = failed.into_result().expect_err("Error responses should convert.");

		assert!(matches!(err, Error::Popup { ref error, .. } if error == "access_denied"));
	}
}
