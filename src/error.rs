//! Bridge-level error types shared across the loader, flows, and decoder.

// self
use crate::{
	_prelude::*,
	sdk::{NotDisplayedReason, SkippedReason},
};

/// Bridge-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical bridge error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; never reaches the SDK.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The SDK script could not be loaded.
	#[error(transparent)]
	Load(#[from] LoadError),
	/// A credential could not be decoded.
	#[error(transparent)]
	MalformedToken(#[from] MalformedTokenError),

	/// The One-Tap prompt was not displayed.
	#[error("Prompt was not displayed: {reason}.")]
	PromptNotDisplayed {
		/// Reason code reported by the SDK.
		reason: NotDisplayedReason,
	},
	/// The One-Tap prompt was skipped.
	#[error("Prompt was skipped: {reason}.")]
	PromptSkipped {
		/// Reason code reported by the SDK.
		reason: SkippedReason,
	},
	/// A popup response echoed a `state` that does not belong to the call.
	#[error("Popup response state `{returned}` does not match the request state `{expected}`.")]
	StateMismatch {
		/// State sent with the request.
		expected: String,
		/// State echoed by the response.
		returned: String,
	},
	/// The SDK answered a popup with an OAuth error response.
	#[error("Popup returned an OAuth error: {error}.")]
	Popup {
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, when supplied.
		description: Option<String>,
	},
	/// The SDK released every callback of an interaction without settling it.
	#[error("Interaction was abandoned before it settled.")]
	Abandoned,
}
impl Error {
	/// Returns true for outcomes an end user can recover from by retrying.
	///
	/// Configuration and malformed-token errors are programmer errors and return false.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			Self::PromptNotDisplayed { .. }
				| Self::PromptSkipped { .. }
				| Self::Popup { .. }
				| Self::Abandoned
		)
	}
}

/// Configuration and validation failures raised before any SDK interaction.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Neither the call site nor the installed options supply a client id.
	#[error("No client id is configured for this call.")]
	MissingClientId,
	/// A configured client id is blank.
	#[error("Client id cannot be blank.")]
	BlankClientId,
	/// The top-level client id disagrees with the id configuration's.
	#[error("Client id `{options}` disagrees with id configuration client id `{id_configuration}`.")]
	ConflictingClientId {
		/// Top-level client id.
		options: String,
		/// Client id nested in the id configuration.
		id_configuration: String,
	},
	/// A configuration document could not be parsed.
	#[error("Options could not be parsed at `{path}`: {message}.")]
	Parse {
		/// Path of the offending field.
		path: String,
		/// Parser message.
		message: String,
	},
}

/// Failures surfaced by the library loader.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum LoadError {
	/// The script injector reported a failure.
	#[error("SDK script failed to load: {reason}.")]
	ScriptFailed {
		/// Injector-supplied reason.
		reason: String,
	},
	/// The loader was dropped while callers were still waiting.
	#[error("SDK loader shut down before the script loaded.")]
	Abandoned,
}

/// Decoder failure for compact JWT credentials.
#[derive(Debug, ThisError)]
pub enum MalformedTokenError {
	/// The token has fewer than two `.`-separated segments.
	#[error("Token has no payload segment.")]
	MissingPayload,
	/// The payload segment is not URL-safe base64.
	#[error("Token payload is not valid base64url.")]
	Base64(#[from] base64::DecodeError),
	/// The decoded payload is not UTF-8 text.
	#[error("Token payload is not UTF-8.")]
	Utf8(#[from] std::string::FromUtf8Error),
	/// The decoded payload is not valid JSON for the requested type.
	#[error("Token payload is not valid JSON at `{path}`.")]
	Json {
		/// Path of the offending field.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
