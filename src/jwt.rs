//! Compact JWT payload decoding for SDK credentials.
//!
//! Decoding only reads the payload segment. Signatures are not checked; verify ID tokens on the
//! backend before trusting any claim.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::MalformedTokenError};

/// Decodes the payload of a compact token into untyped JSON.
pub fn decode(token: &str) -> Result<serde_json::Value, MalformedTokenError> {
	decode_as(token)
}

/// Decodes the payload of a compact token into `T`.
pub fn decode_as<T>(token: &str) -> Result<T, MalformedTokenError>
where
	T: DeserializeOwned,
{
	let segment = token.split('.').nth(1).ok_or(MalformedTokenError::MissingPayload)?;
	let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('='))?;
	let text = String::from_utf8(bytes)?;
	let mut de = serde_json::Deserializer::from_str(&text);
	let payload = serde_path_to_error::deserialize(&mut de).map_err(|err| {
		MalformedTokenError::Json { path: err.path().to_string(), source: err.into_inner() }
	})?;

	de.end().map_err(|source| MalformedTokenError::Json { path: ".".into(), source })?;

	Ok(payload)
}

/// Payload of a Google-issued ID token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoogleIdClaims {
	/// Issuer (`accounts.google.com` or `https://accounts.google.com`).
	pub iss: String,
	/// Stable account identifier.
	pub sub: String,
	/// Client id the token was issued for.
	pub aud: String,
	/// Authorized party.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub azp: Option<String>,
	/// Issued-at instant.
	#[serde(with = "time::serde::timestamp")]
	pub iat: OffsetDateTime,
	/// Expiry instant.
	#[serde(with = "time::serde::timestamp")]
	pub exp: OffsetDateTime,
	/// Not-before instant.
	#[serde(default, with = "time::serde::timestamp::option", skip_serializing_if = "Option::is_none")]
	pub nbf: Option<OffsetDateTime>,
	/// Email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Whether Google verified the email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email_verified: Option<bool>,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Given name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub given_name: Option<String>,
	/// Family name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub family_name: Option<String>,
	/// Profile picture URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub picture: Option<String>,
	/// Workspace domain.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hd: Option<String>,
	/// Nonce from the id configuration.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nonce: Option<String>,
	/// Token identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub jti: Option<String>,
	/// Claims without a dedicated field.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}
impl GoogleIdClaims {
	/// Returns true once `now` reaches the expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.exp
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn encode(payload: &serde_json::Value) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
		let body = URL_SAFE_NO_PAD
			.encode(serde_json::to_vec(payload).expect("Payload fixture should serialize."));

		format!("{header}.{body}.signature")
	}

	#[test]
	fn decode_inverts_encoding() {
		let payloads = [
			serde_json::json!({ "sub": "1234", "email": "ada@example.com" }),
			serde_json::json!({ "nested": { "list": [1, 2, 3] }, "unicode": "Grüße ✓" }),
			serde_json::json!({}),
			serde_json::json!([true, null]),
		];

		for payload in payloads {
			assert_eq!(decode(&encode(&payload)).expect("Token should decode."), payload);
		}
	}

	#[test]
	fn decode_inverts_generated_payloads() {
		// crates.io
		use rand::{Rng, distr::Alphanumeric};

		let mut rng = rand::rng();
		let mut remainders = [false; 3];

		for _ in 0..256 {
			let mut payload = serde_json::Map::new();

			for _ in 0..rng.random_range(0..8) {
				let len = rng.random_range(1..12);
				let key = (&mut rng)
					.sample_iter(Alphanumeric)
					.take(len)
					.map(char::from)
					.collect::<String>();
				let value = match rng.random_range(0..4) {
					0 => serde_json::json!(rng.random::<i64>()),
					1 => serde_json::json!(rng.random::<bool>()),
					2 => serde_json::json!(
						(0..rng.random_range(0..24)).map(|_| rng.random::<char>()).collect::<String>()
					),
					_ => serde_json::Value::Null,
				};

				payload.insert(key, value);
			}

			let payload = serde_json::Value::Object(payload);
			let bytes = serde_json::to_vec(&payload).expect("Payload should serialize.");
			let padded = base64::engine::general_purpose::URL_SAFE.encode(&bytes);

			remainders[bytes.len() % 3] = true;

			assert_eq!(decode(&encode(&payload)).expect("Token should decode."), payload);
			assert_eq!(decode(&format!("h.{padded}.s")).expect("Padded token should decode."), payload);
		}

		assert!(remainders.iter().all(|seen| *seen), "Every padding length should be covered.");
	}

	#[test]
	fn decode_tolerates_padding_and_missing_signature() {
		let body = base64::engine::general_purpose::URL_SAFE.encode(br#"{"a":1}"#);

		assert_eq!(
			decode(&format!("h.{body}")).expect("Two segments suffice."),
			serde_json::json!({ "a": 1 })
		);
	}

	#[test]
	fn malformed_tokens_are_rejected() {
		assert!(matches!(decode("onlyonepart"), Err(MalformedTokenError::MissingPayload)));
		assert!(decode("not.valid").is_err());
		assert!(matches!(decode("not.dmFsaWQ"), Err(MalformedTokenError::Json { .. })));
		assert!(matches!(decode("a.%%%.c"), Err(MalformedTokenError::Base64(_))));

		let not_utf8 = URL_SAFE_NO_PAD.encode([0xff, 0xfe]);

		assert!(matches!(decode(&format!("a.{not_utf8}.c")), Err(MalformedTokenError::Utf8(_))));

		let trailing = URL_SAFE_NO_PAD.encode(br#"{"a":1} x"#);

		assert!(matches!(decode(&format!("a.{trailing}.c")), Err(MalformedTokenError::Json { .. })));
	}

	#[test]
	fn typed_claims_report_field_path() {
		let token = encode(&serde_json::json!({
			"iss": "https://accounts.google.com",
			"sub": "110169484474386276334",
			"aud": "abc.apps.googleusercontent.com",
			"iat": 1_700_000_000,
			"exp": 1_700_003_600,
			"email": "ada@example.com",
			"email_verified": true,
			"locale": "en"
		}));
		let claims: GoogleIdClaims = decode_as(&token).expect("Claims should decode.");

		assert_eq!(claims.sub, "110169484474386276334");
		assert_eq!(claims.email_verified, Some(true));
		assert_eq!(claims.extra.get("locale"), Some(&serde_json::json!("en")));
		assert!(claims.is_expired_at(claims.exp));
		assert!(!claims.is_expired_at(claims.iat));

		#[derive(Debug, Deserialize)]
		struct Window {
			#[allow(dead_code)]
			session: Session,
		}
		#[derive(Debug, Deserialize)]
		struct Session {
			#[allow(dead_code)]
			iat: i64,
		}

		let bad = encode(&serde_json::json!({ "session": { "iat": "soon" } }));
		let err = decode_as::<Window>(&bad).expect_err("String iat should fail.");

		assert!(matches!(err, MalformedTokenError::Json { ref path, .. } if path == "session.iat"));
	}
}
