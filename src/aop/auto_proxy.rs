// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Post-construction hook that substitutes proxies for managed components.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::advisor::Advisor;
use super::component::Component;
use super::pointcut::ScopeFilter;
use super::proxy::weave;
use crate::error::ProxyError;

/// Called by a container after each component is constructed.
///
/// Whatever the processor returns is what the container publishes under
/// `name`.
pub trait PostProcessor: Send + Sync {
    fn after_construction(&self, component: Component, name: &str) -> Result<Component, ProxyError>;
}

/// How the hook decides which components to proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection {
    /// Components declared inside the base scope.
    #[default]
    BaseScope,
    /// Components on which at least one advisor could fire.
    Advisors,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::BaseScope => write!(f, "baseScope"),
            Selection::Advisors => write!(f, "advisors"),
        }
    }
}

/// Replaces eligible components with proxies carrying a shared advisor list.
///
/// In base-scope mode every component inside the scope is proxied and a
/// component that cannot be proxied is an error. In advisor-driven mode a
/// component is proxied when some advisor accepts its type and matches one
/// of its methods; anything else is returned unchanged.
pub struct AutoProxyHook {
    base_scope: Option<ScopeFilter>,
    excluded_scopes: Vec<ScopeFilter>,
    advisors: Vec<Arc<Advisor>>,
    force_concrete: bool,
}

impl AutoProxyHook {
    pub fn for_scope(base_scope: impl Into<ScopeFilter>, advisors: Vec<Arc<Advisor>>) -> Self {
        Self {
            base_scope: Some(base_scope.into()),
            excluded_scopes: Vec::new(),
            advisors,
            force_concrete: false,
        }
    }

    pub fn advisor_driven(advisors: Vec<Arc<Advisor>>) -> Self {
        Self {
            base_scope: None,
            excluded_scopes: Vec::new(),
            advisors,
            force_concrete: false,
        }
    }

    /// Never proxy components inside `scope`.
    pub fn excluding(mut self, scope: impl Into<ScopeFilter>) -> Self {
        self.excluded_scopes.push(scope.into());
        self
    }

    pub fn with_force_concrete_strategy(mut self, force: bool) -> Self {
        self.force_concrete = force;
        self
    }

    pub fn selection(&self) -> Selection {
        match self.base_scope {
            Some(_) => Selection::BaseScope,
            None => Selection::Advisors,
        }
    }

    pub fn base_scope(&self) -> Option<&ScopeFilter> {
        self.base_scope.as_ref()
    }

    pub fn excluded_scopes(&self) -> &[ScopeFilter] {
        &self.excluded_scopes
    }

    pub fn advisors(&self) -> &[Arc<Advisor>] {
        &self.advisors
    }

    /// Check whether `component` would be replaced by a proxy.
    pub fn is_candidate(&self, component: &Component) -> bool {
        let target = component.target_type();
        if self.excluded_scopes.iter().any(|scope| scope.accepts(target)) {
            return false;
        }

        match &self.base_scope {
            Some(scope) => scope.accepts(target),
            None => {
                component.is_proxyable()
                    && self.advisors.iter().any(|advisor| {
                        let pointcut = advisor.pointcut();
                        pointcut.accepts_type(target)
                            && component
                                .methods()
                                .iter()
                                .any(|method| pointcut.matches_method(method))
                    })
            }
        }
    }
}

impl PostProcessor for AutoProxyHook {
    fn after_construction(&self, component: Component, name: &str) -> Result<Component, ProxyError> {
        if component.is_proxy() {
            debug!(name, target_type = %component.target_type(), "Component is already a proxy");
            return Ok(component);
        }

        if !self.is_candidate(&component) {
            debug!(name, target_type = %component.target_type(), "Component left unproxied");
            return Ok(component);
        }

        match weave(&component, &self.advisors, self.force_concrete) {
            Ok(proxy) => {
                info!(
                    name,
                    target_type = %component.target_type(),
                    strategy = ?proxy.strategy(),
                    "Substituted proxy for component"
                );
                Ok(proxy)
            }
            Err(e) => {
                warn!(name, target_type = %component.target_type(), error = %e, "Cannot proxy component");
                Err(e)
            }
        }
    }
}

impl fmt::Debug for AutoProxyHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoProxyHook")
            .field("base_scope", &self.base_scope)
            .field("excluded_scopes", &self.excluded_scopes)
            .field("advisors", &self.advisors)
            .field("force_concrete", &self.force_concrete)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aop::advice::{Advice, Invocation, Outcome};
    use crate::aop::chain::AdvisorChain;
    use crate::aop::component::{Capability, Target};
    use crate::aop::pointcut::Pointcut;

    mod shop {
        use super::*;

        pub trait Shelf: Target + Send + Sync {
            fn stock(&self) -> u32;
        }

        pub struct WoodenShelf;

        impl Shelf for WoodenShelf {
            fn stock(&self) -> u32 {
                3
            }
        }

        struct ShelfProxy {
            target: Arc<dyn Shelf>,
            chain: AdvisorChain,
        }

        impl Shelf for ShelfProxy {
            fn stock(&self) -> u32 {
                self.chain.invoke_infallible("stock", &[], || self.target.stock())
            }
        }

        impl Capability for dyn Shelf {
            const METHODS: &'static [&'static str] = &["stock"];

            fn proxy(target: Arc<Self>, chain: AdvisorChain) -> Arc<Self> {
                Arc::new(ShelfProxy { target, chain })
            }
        }
    }

    mod storage {
        pub struct Vault;
    }

    use shop::{Shelf, WoodenShelf};

    struct Noop;

    impl Advice for Noop {
        fn invoke<'a>(&self, invocation: Invocation<'a>) -> Outcome<'a> {
            invocation.proceed()
        }
    }

    fn scope_of_tests() -> String {
        module_path!().to_string()
    }

    fn shelf() -> Component {
        Component::from_capability::<dyn Shelf>(Arc::new(WoodenShelf))
    }

    #[test]
    fn test_base_scope_proxies_in_scope() {
        let hook = AutoProxyHook::for_scope(
            format!("{}::shop", scope_of_tests()),
            vec![Advisor::always("noop", Noop).shared()],
        );
        let proxy = hook.after_construction(shelf(), "shelf").unwrap();
        assert!(proxy.is_capability_proxy());
        assert_eq!(proxy.get::<dyn Shelf>().unwrap().stock(), 3);
    }

    #[test]
    fn test_base_scope_skips_out_of_scope() {
        let hook = AutoProxyHook::for_scope(
            format!("{}::shop", scope_of_tests()),
            vec![Advisor::always("noop", Noop).shared()],
        );
        let vault = Arc::new(storage::Vault);
        let result = hook
            .after_construction(Component::sealed(Arc::clone(&vault)), "vault")
            .unwrap();
        assert!(!result.is_proxy());
        assert!(Arc::ptr_eq(&result.get::<storage::Vault>().unwrap(), &vault));
    }

    #[test]
    fn test_base_scope_rejects_sealed_in_scope() {
        let hook = AutoProxyHook::for_scope(
            format!("{}::storage", scope_of_tests()),
            vec![Advisor::always("noop", Noop).shared()],
        );
        let err = hook
            .after_construction(Component::sealed(Arc::new(storage::Vault)), "vault")
            .unwrap_err();
        assert!(matches!(err, ProxyError::Unproxyable(_)));
    }

    #[test]
    fn test_excluded_scope_wins() {
        let base = scope_of_tests();
        let hook = AutoProxyHook::for_scope(base.clone(), vec![Advisor::always("noop", Noop).shared()])
            .excluding(format!("{}::storage", base));
        assert!(!hook.is_candidate(&Component::sealed(Arc::new(storage::Vault))));
        assert!(hook.is_candidate(&shelf()));
    }

    #[test]
    fn test_advisor_driven_selection() {
        let matching = AutoProxyHook::advisor_driven(vec![Advisor::new(
            "stock",
            Pointcut::name_match(["stock*"]).unwrap(),
            Noop,
        )
        .shared()]);
        let other = AutoProxyHook::advisor_driven(vec![Advisor::new(
            "save",
            Pointcut::name_match(["save*"]).unwrap(),
            Noop,
        )
        .shared()]);

        assert_eq!(matching.selection(), Selection::Advisors);
        assert!(matching.is_candidate(&shelf()));
        assert!(!other.is_candidate(&shelf()));
        assert!(!matching.is_candidate(&Component::sealed(Arc::new(storage::Vault))));
    }

    #[test]
    fn test_already_proxied_component_passes_through() {
        let hook = AutoProxyHook::advisor_driven(vec![Advisor::always("noop", Noop).shared()]);
        let proxy = hook.after_construction(shelf(), "shelf").unwrap();
        let again = hook.after_construction(proxy.clone(), "shelf").unwrap();
        assert!(Arc::ptr_eq(
            &proxy.get::<dyn Shelf>().unwrap(),
            &again.get::<dyn Shelf>().unwrap()
        ));
    }
}
