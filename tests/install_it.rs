// self
use gsi_bridge::{
	_preludet::*,
	error::{ConfigError, LoadError},
	flows::PromptOptions,
	sdk::{ButtonConfig, ButtonParent, ButtonShape, ButtonTheme, CredentialResponse, SdkHandle},
	state::{AuthOptions, PopupType},
};

#[tokio::test]
async fn install_initializes_once_the_library_loads() {
	let (auth, sdk, injector) = build_pending_auth();
	let credentials = Arc::new(Mutex::new(Vec::new()));
	let credentials_by_callback = credentials.clone();

	auth.install(
		AuthOptions::new("installed-client")
			.with_prompt(true)
			.with_popup_type(PopupType::Token)
			.with_callback(move |response| credentials_by_callback.lock().push(response)),
	)
	.expect("Install should accept valid options.");

	assert!(!auth.library_loaded());
	assert!(auth.library_state().api_load_initiated);
	assert_eq!(injector.injections(), 1);
	assert_eq!(sdk.initialized(), 0);

	let handle: SdkHandle = Arc::new(sdk.clone());

	injector.load(handle);
	auth.wait_library_loaded().await.expect("Library should be loaded.");

	assert!(auth.library_loaded());
	assert_eq!(sdk.initialized(), 1);
	assert_eq!(sdk.prompts(), 1);

	let config = sdk.last_configuration().expect("Install should initialize the SDK.");

	assert_eq!(config.client_id.as_deref(), Some("installed-client"));
	assert_eq!(config.auto_select, Some(false));

	let response = CredentialResponse { client_id: Some("installed-client".into()), ..Default::default() };

	assert!(sdk.emit_credential(response.clone()));
	assert_eq!(*credentials.lock(), [response]);
}

#[tokio::test]
async fn button_sign_in_after_a_prompt_reaches_the_installed_callback() {
	let (auth, sdk, injector) = build_pending_auth();
	let subjects = Arc::new(Mutex::new(Vec::new()));
	let subjects_by_callback = subjects.clone();

	auth.install(AuthOptions::new("installed-client").with_callback(move |response| {
		subjects_by_callback.lock().push(response.client_id.unwrap_or_default())
	}))
	.expect("Install should accept valid options.");
	injector.load(Arc::new(sdk.clone()));

	let credential =
		|source: &str| CredentialResponse { client_id: Some(source.into()), ..Default::default() };

	assert!(sdk.emit_credential(credential("button-before")));

	let (result, ()) = tokio::join!(auth.open_prompt(PromptOptions::default()), async {
		wait_until(|| sdk.prompts() == 1).await;
		sdk.emit_credential(credential("one-tap"));
	});

	assert_eq!(
		result.expect("Credential should resolve the prompt.").client_id.as_deref(),
		Some("one-tap")
	);
	assert_eq!(sdk.initialized(), 2, "The prompt replaces the installed configuration.");
	assert!(sdk.emit_credential(credential("button-after")));
	assert_eq!(*subjects.lock(), ["button-before", "one-tap", "button-after"]);
}

#[tokio::test]
async fn install_after_a_failed_load_is_rejected() {
	let (auth, sdk, injector) = build_pending_auth();

	auth.logout();
	injector.fail("blocked by CSP");

	let expected = LoadError::ScriptFailed { reason: "blocked by CSP".into() };

	assert!(matches!(
		auth.install(AuthOptions::new("client").with_prompt(true)),
		Err(Error::Load(ref err)) if *err == expected
	));
	assert!(auth.state.current().client_id.is_none(), "Rejected options are not stored.");
	assert_eq!(injector.injections(), 1);
	assert_eq!(sdk.initialized(), 0);
	assert_eq!(sdk.disable_auto_select_calls(), 0);
}

#[tokio::test]
async fn install_rejects_invalid_options() {
	let (auth, _, injector) = build_pending_auth();

	assert!(matches!(
		auth.install(AuthOptions::new(" ")),
		Err(Error::Config(ConfigError::BlankClientId))
	));
	assert_eq!(injector.injections(), 0);

	let options = AuthOptions::from_json(
		r#"{"clientId":"one","idConfiguration":{"client_id":"two"}}"#,
	)
	.expect("Document should parse.");

	assert!(matches!(
		auth.install(options),
		Err(Error::Config(ConfigError::ConflictingClientId { .. }))
	));
}

#[tokio::test]
async fn helpers_run_once_ready() {
	let (auth, sdk) = build_test_auth();
	let button = ButtonConfig {
		theme: Some(ButtonTheme::FilledBlue),
		shape: Some(ButtonShape::Pill),
		..Default::default()
	};

	auth.configure(AuthOptions::new("client").with_button_config(button.clone()))
		.expect("Options should validate.");
	auth.render_button(ButtonParent::new("signin"), None, None);
	auth.render_button(ButtonParent::new("footer"), Some(ButtonConfig::default()), None);
	auth.logout();
	auth.cancel_prompt();
	auth.revoke("ada@example.com").await.expect("Revocation should confirm.");

	let rendered = sdk.rendered_buttons();

	assert_eq!(rendered.len(), 2);
	assert_eq!(rendered[0], (ButtonParent::new("signin"), button));
	assert_eq!(rendered[1].0.element_id(), "footer");
	assert_eq!(rendered[1].1, ButtonConfig::default());
	assert_eq!(sdk.disable_auto_select_calls(), 1);
	assert_eq!(sdk.cancel_calls(), 1);
	assert_eq!(sdk.revoked_hints(), ["ada@example.com"]);
}

#[tokio::test]
async fn actions_before_load_are_deferred() {
	let (auth, sdk, injector) = build_pending_auth();

	auth.logout();
	auth.render_button(ButtonParent::new("signin"), None, None);

	assert_eq!(sdk.disable_auto_select_calls(), 0);
	assert_eq!(injector.injections(), 1);

	injector.load(Arc::new(sdk.clone()));

	assert_eq!(sdk.disable_auto_select_calls(), 1);
	assert_eq!(sdk.rendered_buttons().len(), 1);
}
