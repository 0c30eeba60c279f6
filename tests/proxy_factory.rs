// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Proxy construction through `ProxyFactory`: strategy choice, forced
//! concrete proxies and proxy introspection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use weave::aop::{
    Advice, Advisor, Component, Extensible, Extension, Invocation, Outcome, Pointcut, ProxyFactory,
    ProxyStrategy,
};
use weave::app::orders::v1::{OrderRepositoryV1, OrderRepositoryV1Impl};
use weave::app::orders::v2::OrderRepositoryV2;
use weave::app::orders::{OrderError, FAILING_ITEM_ID};
use weave::aop::AutoProxyHook;
use weave::container::Container;
use weave::error::{ContainerError, ProxyError};

// ============================================================================
// Helpers
// ============================================================================

/// Records the method name of every call it sees.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Advice for Recorder {
    fn invoke<'a>(&self, invocation: Invocation<'a>) -> Outcome<'a> {
        self.calls
            .lock()
            .unwrap()
            .push(invocation.signature().short_string());
        invocation.proceed()
    }
}

/// Concrete repository that also implements the capability trait.
struct LedgerRepository {
    saved: Mutex<Vec<String>>,
    extension: Extension<Self>,
}

impl LedgerRepository {
    fn new() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            extension: Extension::new(),
        }
    }

    fn saved(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

impl OrderRepositoryV1 for LedgerRepository {
    fn save(&self, item_id: &str) -> Result<(), OrderError> {
        self.extension.call(self, "save", &[&item_id], |ledger| {
            ledger.saved.lock().unwrap().push(item_id.to_string());
            Ok(())
        })
    }
}

impl Extensible for LedgerRepository {
    const METHODS: &'static [&'static str] = &["save"];

    fn extension(&self) -> &Extension<Self> {
        &self.extension
    }

    fn construct(_target: &Self) -> Result<Self, ProxyError> {
        Ok(Self::new())
    }
}

/// Concrete type whose stand-in cannot be built.
struct Socketed {
    extension: Extension<Self>,
}

impl Socketed {
    fn ping(&self) -> String {
        self.extension.call_infallible(self, "ping", &[], |_| "pong".to_string())
    }
}

impl Extensible for Socketed {
    const METHODS: &'static [&'static str] = &["ping"];

    fn extension(&self) -> &Extension<Self> {
        &self.extension
    }

    fn construct(_target: &Self) -> Result<Self, ProxyError> {
        Err(ProxyError::no_construction_path("Socketed", "needs an open socket"))
    }
}

fn socketed_component() -> Component {
    Component::from_extensible(Arc::new(Socketed {
        extension: Extension::new(),
    }))
}

fn ledger_component(ledger: Arc<LedgerRepository>) -> Component {
    Component::from_implementation::<LedgerRepository, dyn OrderRepositoryV1>(ledger, |ledger| ledger)
}

// ============================================================================
// Strategy selection
// ============================================================================

#[test]
fn test_capability_target_gets_capability_proxy() {
    let recorder = Recorder::default();
    let component =
        Component::from_capability::<dyn OrderRepositoryV1>(Arc::new(OrderRepositoryV1Impl::new(Duration::ZERO)));

    let factory = ProxyFactory::new(component).with_advice(recorder.clone());
    assert_eq!(factory.strategy().unwrap(), ProxyStrategy::Capability);

    let proxy = factory.proxy().unwrap();
    assert!(proxy.is_capability_proxy());
    assert_eq!(proxy.target_type().simple_name(), "OrderRepositoryV1Impl");

    let repository = proxy.get::<dyn OrderRepositoryV1>().unwrap();
    repository.save("item-1").unwrap();
    assert_eq!(recorder.calls(), vec!["OrderRepositoryV1Impl.save()"]);
}

#[test]
fn test_concrete_target_gets_concrete_proxy() {
    let recorder = Recorder::default();
    let component = Component::from_extensible(Arc::new(OrderRepositoryV2::new(Duration::ZERO)));

    let proxy = ProxyFactory::new(component)
        .with_advice(recorder.clone())
        .proxy()
        .unwrap();
    assert!(proxy.is_concrete_proxy());
    assert_eq!(proxy.target_type().simple_name(), "OrderRepositoryV2");

    let repository = proxy.get::<OrderRepositoryV2>().unwrap();
    assert!(repository.extension().is_extended());
    repository.save("item-1").unwrap();
    assert_eq!(recorder.calls(), vec!["OrderRepositoryV2.save()"]);
}

#[test]
fn test_implementation_defaults_to_capability() {
    let ledger = Arc::new(LedgerRepository::new());
    let factory = ProxyFactory::new(ledger_component(Arc::clone(&ledger)));
    assert_eq!(factory.strategy().unwrap(), ProxyStrategy::Capability);

    let proxy = factory.proxy().unwrap();
    assert!(proxy.is_capability_proxy());
    assert!(proxy.get::<dyn OrderRepositoryV1>().is_some());
    assert!(proxy.get::<LedgerRepository>().is_none());
}

#[test]
fn test_forced_concrete_on_implementation() {
    let recorder = Recorder::default();
    let ledger = Arc::new(LedgerRepository::new());

    let proxy = ProxyFactory::new(ledger_component(Arc::clone(&ledger)))
        .with_force_concrete_strategy(true)
        .with_advice(recorder.clone())
        .proxy()
        .unwrap();
    assert!(proxy.is_concrete_proxy());
    assert_eq!(proxy.target_type().simple_name(), "LedgerRepository");

    // Both views reach the real target through the chain.
    proxy.get::<dyn OrderRepositoryV1>().unwrap().save("a").unwrap();
    proxy.get::<LedgerRepository>().unwrap().save("b").unwrap();

    assert_eq!(ledger.saved(), vec!["a", "b"]);
    assert_eq!(recorder.calls().len(), 2);
}

#[test]
fn test_forced_concrete_without_extension_point() {
    let component =
        Component::from_capability::<dyn OrderRepositoryV1>(Arc::new(OrderRepositoryV1Impl::new(Duration::ZERO)));

    let err = ProxyFactory::new(component)
        .with_force_concrete_strategy(true)
        .proxy()
        .unwrap_err();
    assert!(matches!(err, ProxyError::StrategyUnavailable(_)));
}

#[test]
fn test_sealed_target_is_unproxyable() {
    let component = Component::sealed(Arc::new(String::from("plain")));
    let err = ProxyFactory::new(component).proxy().unwrap_err();
    assert!(matches!(err, ProxyError::Unproxyable(_)));
}

// ============================================================================
// Behaviour through proxies
// ============================================================================

#[test]
fn test_errors_reach_caller_unchanged() {
    let component =
        Component::from_capability::<dyn OrderRepositoryV1>(Arc::new(OrderRepositoryV1Impl::new(Duration::ZERO)));
    let proxy = ProxyFactory::new(component)
        .with_advice(Recorder::default())
        .proxy()
        .unwrap();

    let err = proxy
        .get::<dyn OrderRepositoryV1>()
        .unwrap()
        .save(FAILING_ITEM_ID)
        .unwrap_err();
    assert!(matches!(err, OrderError::IllegalState(_)));
}

#[test]
fn test_unmatched_methods_pass_through() {
    let recorder = Recorder::default();
    let advisor = Advisor::new("orders-only", Pointcut::name_match(["order*"]).unwrap(), recorder.clone());

    let proxy = ProxyFactory::new(Component::from_extensible(Arc::new(OrderRepositoryV2::new(Duration::ZERO))))
        .with_advisor(advisor)
        .proxy()
        .unwrap();

    proxy.get::<OrderRepositoryV2>().unwrap().save("item-1").unwrap();
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_original_is_untouched() {
    let recorder = Recorder::default();
    let original = Arc::new(OrderRepositoryV2::new(Duration::ZERO));

    let proxy = ProxyFactory::new(Component::from_extensible(Arc::clone(&original)))
        .with_advice(recorder.clone())
        .proxy()
        .unwrap();

    original.save("direct").unwrap();
    assert!(!original.extension().is_extended());
    assert!(recorder.calls().is_empty());

    let proxied = proxy.get::<OrderRepositoryV2>().unwrap();
    assert!(!Arc::ptr_eq(&original, &proxied));
}

// ============================================================================
// Construction failures
// ============================================================================

#[test]
fn test_missing_construction_path_fails_proxy() {
    let err = ProxyFactory::new(socketed_component())
        .with_advice(Recorder::default())
        .proxy()
        .unwrap_err();
    match err {
        ProxyError::NoConstructionPath { target, reason } => {
            assert_eq!(target, "Socketed");
            assert_eq!(reason, "needs an open socket");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_construction_path_fails_registration() {
    let hook = AutoProxyHook::advisor_driven(vec![Advisor::always("recorder", Recorder::default()).shared()]);
    let mut container = Container::new().with_post_processor(Arc::new(hook));

    let err = container
        .register("socketed", |_| Ok(socketed_component()))
        .unwrap_err();
    match err {
        ContainerError::PostProcess { name, source } => {
            assert_eq!(name, "socketed");
            assert!(matches!(source, ProxyError::NoConstructionPath { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(container.component("socketed").is_none());

    // The unproxied value still works.
    let plain = socketed_component().get::<Socketed>().unwrap();
    assert_eq!(plain.ping(), "pong");
}
