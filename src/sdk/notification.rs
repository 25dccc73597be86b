//! One-Tap moment notifications.
//!
//! The SDK reports prompt progress as a stream of moments (display, skipped, dismissed), each
//! carrying a reason drawn from a closed set. [`PromptNotification`] encodes the moment and its
//! reason in one tagged value; the accessor methods reproduce the SDK's `isDisplayMoment()`
//! family so listeners port over unchanged.

// self
use crate::{_prelude::*, sdk::UnknownWireValue};

wire_enum! {
	/// Why the prompt UI was not displayed.
	NotDisplayedReason, "not-displayed reason" {
		/// The browser cannot show the prompt.
		BrowserNotSupported => "browser_not_supported",
		/// The client id is not valid.
		InvalidClient => "invalid_client",
		/// No client id was configured.
		MissingClientId => "missing_client_id",
		/// The user opted out or has no Google session.
		OptOutOrNoSession => "opt_out_or_no_session",
		/// The page is not served over HTTPS.
		SecureHttpRequired => "secure_http_required",
		/// The user suppressed the prompt (cool-down).
		SuppressedByUser => "suppressed_by_user",
		/// The page origin is not registered for the client id.
		UnregisteredOrigin => "unregistered_origin",
		/// Unspecified reason.
		UnknownReason => "unknown_reason",
	}
}

wire_enum! {
	/// Why the prompt was skipped.
	SkippedReason, "skipped reason" {
		/// Auto-select was cancelled.
		AutoCancel => "auto_cancel",
		/// The user closed the prompt.
		UserCancel => "user_cancel",
		/// The user clicked outside the prompt.
		TapOutside => "tap_outside",
		/// Issuing the credential failed.
		IssuingFailed => "issuing_failed",
	}
}

wire_enum! {
	/// Why the prompt was dismissed.
	DismissedReason, "dismissed reason" {
		/// A credential was delivered to the credential callback.
		CredentialReturned => "credential_returned",
		/// `cancel` was called.
		CancelCalled => "cancel_called",
		/// A new flow replaced this one.
		FlowRestarted => "flow_restarted",
	}
}

wire_enum! {
	/// Moment type reported by `getMomentType()`.
	MomentType, "moment type" {
		/// Display moment.
		Display => "display",
		/// Skipped moment.
		Skipped => "skipped",
		/// Dismissed moment.
		Dismissed => "dismissed",
	}
}

/// Outcome of a display moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayMoment {
	/// The prompt is on screen.
	Displayed,
	/// The prompt could not be shown.
	NotDisplayed(NotDisplayedReason),
}

/// Single moment notification from the prompt UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromptNotification {
	/// Display moment.
	Display(DisplayMoment),
	/// Skipped moment.
	Skipped(SkippedReason),
	/// Dismissed moment.
	Dismissed(DismissedReason),
}
impl PromptNotification {
	/// Builds a notification from the SDK's moment type and optional reason strings.
	///
	/// Display moments without a reason are `Displayed`; every other moment requires a reason.
	pub fn from_parts(moment: &str, reason: Option<&str>) -> Result<Self, UnknownWireValue> {
		let missing = || UnknownWireValue { kind: "moment reason", value: String::new() };

		Ok(match moment.parse::<MomentType>()? {
			MomentType::Display => match reason {
				None => Self::Display(DisplayMoment::Displayed),
				Some(reason) => Self::Display(DisplayMoment::NotDisplayed(reason.parse()?)),
			},
			MomentType::Skipped => Self::Skipped(reason.ok_or_else(missing)?.parse()?),
			MomentType::Dismissed => Self::Dismissed(reason.ok_or_else(missing)?.parse()?),
		})
	}

	/// Is this notification for a display moment?
	pub fn is_display_moment(&self) -> bool {
		matches!(self, Self::Display(_))
	}

	/// Is this a display moment where the UI is displayed?
	pub fn is_displayed(&self) -> bool {
		matches!(self, Self::Display(DisplayMoment::Displayed))
	}

	/// Is this a display moment where the UI is not displayed?
	pub fn is_not_displayed(&self) -> bool {
		matches!(self, Self::Display(DisplayMoment::NotDisplayed(_)))
	}

	/// Reason the UI is not displayed.
	pub fn not_displayed_reason(&self) -> Option<NotDisplayedReason> {
		match self {
			Self::Display(DisplayMoment::NotDisplayed(reason)) => Some(*reason),
			_ => None,
		}
	}

	/// Is this notification for a skipped moment?
	pub fn is_skipped_moment(&self) -> bool {
		matches!(self, Self::Skipped(_))
	}

	/// Reason for the skipped moment.
	pub fn skipped_reason(&self) -> Option<SkippedReason> {
		match self {
			Self::Skipped(reason) => Some(*reason),
			_ => None,
		}
	}

	/// Is this notification for a dismissed moment?
	pub fn is_dismissed_moment(&self) -> bool {
		matches!(self, Self::Dismissed(_))
	}

	/// Reason for the dismissal.
	pub fn dismissed_reason(&self) -> Option<DismissedReason> {
		match self {
			Self::Dismissed(reason) => Some(*reason),
			_ => None,
		}
	}

	/// Moment type of this notification.
	pub fn moment_type(&self) -> MomentType {
		match self {
			Self::Display(_) => MomentType::Display,
			Self::Skipped(_) => MomentType::Skipped,
			Self::Dismissed(_) => MomentType::Dismissed,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reason_sets_match_wire_strings() {
		let not_displayed: Vec<_> = NotDisplayedReason::ALL.iter().map(|r| r.as_str()).collect();

		assert_eq!(
			not_displayed,
			[
				"browser_not_supported",
				"invalid_client",
				"missing_client_id",
				"opt_out_or_no_session",
				"secure_http_required",
				"suppressed_by_user",
				"unregistered_origin",
				"unknown_reason",
			]
		);
		assert_eq!(SkippedReason::ALL.len(), 4);
		assert_eq!(DismissedReason::ALL.len(), 3);

		for reason in SkippedReason::ALL {
			assert_eq!(reason.as_str().parse::<SkippedReason>(), Ok(*reason));
		}

		let json = serde_json::to_string(&DismissedReason::CredentialReturned)
			.expect("Dismissed reason should serialize.");

		assert_eq!(json, "\"credential_returned\"");
	}

	#[test]
	fn unknown_reason_strings_are_rejected() {
		let err = "later".parse::<SkippedReason>().expect_err("Unknown reason should fail.");

		assert_eq!(err.kind, "skipped reason");
		assert_eq!(err.value, "later");
	}

	#[test]
	fn accessors_follow_moment() {
		let not_displayed =
			PromptNotification::from_parts("display", Some("unregistered_origin"))
				.expect("Display moment should parse.");

		assert!(not_displayed.is_display_moment());
		assert!(not_displayed.is_not_displayed());
		assert!(!not_displayed.is_displayed());
		assert_eq!(not_displayed.not_displayed_reason(), Some(NotDisplayedReason::UnregisteredOrigin));
		assert_eq!(not_displayed.skipped_reason(), None);

		let displayed =
			PromptNotification::from_parts("display", None).expect("Displayed should parse.");

		assert!(displayed.is_displayed());
		assert_eq!(displayed.moment_type(), MomentType::Display);

		let skipped = PromptNotification::from_parts("skipped", Some("tap_outside"))
			.expect("Skipped moment should parse.");

		assert!(skipped.is_skipped_moment());
		assert_eq!(skipped.skipped_reason(), Some(SkippedReason::TapOutside));

		let dismissed = PromptNotification::from_parts("dismissed", Some("cancel_called"))
			.expect("Dismissed moment should parse.");

		assert!(dismissed.is_dismissed_moment());
		assert_eq!(dismissed.dismissed_reason(), Some(DismissedReason::CancelCalled));
		assert!(PromptNotification::from_parts("skipped", None).is_err());
		assert!(PromptNotification::from_parts("hidden", None).is_err());
	}
}
