//! Redaction for the SDK strings that grant access: ID-token credentials, OAuth access tokens
//! and authorization codes.

// self
use crate::_prelude::*;

/// A credential, access token, or authorization code as handed over by the SDK.
///
/// Serializes as the bare string so responses keep their wire shape, but formats as
/// `<redacted>`, which keeps tokens out of `tracing` fields and debug dumps.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	/// Wraps a value received from (or destined for) the SDK.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value, for JWT decoding or a backend exchange. Never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = Secret::new("ya29.secret");

		assert_eq!(format!("{secret:?}"), "Secret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn responses_keep_secrets_out_of_debug_output() {
		let response = crate::sdk::TokenResponse {
			access_token: Some(Secret::new("ya29.secret")),
			scope: Some("email".into()),
			..Default::default()
		};
		let rendered = format!("{response:?}");

		assert!(!rendered.contains("ya29.secret"));
		assert!(rendered.contains("email"));
	}

	#[test]
	fn secret_serializes_as_plain_string() {
		let secret: Secret =
			serde_json::from_str("\"ya29.secret\"").expect("Secret should deserialize.");

		assert_eq!(secret.expose(), "ya29.secret");
		assert_eq!(
			serde_json::to_string(&secret).expect("Secret should serialize."),
			"\"ya29.secret\""
		);
	}
}
