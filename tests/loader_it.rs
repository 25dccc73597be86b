// self
use gsi_bridge::{
	_preludet::*,
	error::LoadError,
	loader::{LibraryState, LoadPhase, Loader, SCRIPT_URL},
};

#[tokio::test]
async fn concurrent_requests_inject_once_and_run_in_order() {
	let injector = FakeInjector::manual();
	let loader = Loader::new(injector.clone());
	let order = Arc::new(Mutex::new(Vec::new()));

	for idx in 0..16 {
		let order = order.clone();

		loader.ensure_loaded(move |_| order.lock().push(idx));
	}

	let waiter = loader.clone();
	let (ready, ()) = tokio::join!(waiter.ready(), async {
		wait_until(|| injector.injections() == 1).await;

		assert_eq!(loader.phase(), LoadPhase::Requested);
		assert!(order.lock().is_empty());

		injector.load(FakeSdk::handle());
	});

	ready.expect("Pending readiness should resolve once loaded.");

	assert_eq!(*order.lock(), (0..16).collect::<Vec<_>>());
	assert_eq!(injector.injections(), 1);
	assert_eq!(injector.injected_urls(), [SCRIPT_URL]);
	assert_eq!(loader.state(), LibraryState { api_loaded: true, api_load_initiated: true });
}

#[tokio::test]
async fn ready_after_load_resolves_without_injecting_again() {
	let injector = FakeInjector::immediate(FakeSdk::handle());
	let loader = Loader::new(injector.clone());

	loader.ready().await.expect("First readiness should resolve.");
	loader.ready().await.expect("Second readiness should resolve.");

	assert_eq!(injector.injections(), 1);
	assert!(loader.sdk().is_some());
}

#[tokio::test]
async fn failure_rejects_pending_and_later_waiters() {
	let injector = FakeInjector::manual();
	let loader = Loader::new(injector.clone());
	let (pending, ()) = tokio::join!(loader.ready(), async {
		wait_until(|| injector.injections() == 1).await;
		injector.fail("network error");
	});
	let expected = LoadError::ScriptFailed { reason: "network error".into() };

	assert!(matches!(pending, Err(Error::Load(ref err)) if *err == expected));
	assert!(matches!(loader.ready().await, Err(Error::Load(ref err)) if *err == expected));
	assert_eq!(loader.phase(), LoadPhase::Failed);
	assert_eq!(
		loader.state(),
		LibraryState { api_loaded: false, api_load_initiated: true },
		"A failed load stays initiated but never loaded."
	);
	assert_eq!(injector.injections(), 1);
}

#[tokio::test]
async fn signals_after_loader_drop_are_ignored() {
	let injector = FakeInjector::manual();

	{
		let loader = Loader::new(injector.clone());

		loader.ensure_loaded(|_| panic!("Action should not run after the loader is gone."));
	}

	injector.load(FakeSdk::handle());
	injector.fail("late");

	assert_eq!(injector.injections(), 1);
}
