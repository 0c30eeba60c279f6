// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Proxy targets and the type-erased components that carry them.
//!
//! A target can be proxied in two ways:
//!
//! - through a **capability set**: a trait used as `dyn Trait`, with
//!   `impl Capability for dyn Trait` naming the forwarding proxy type;
//! - through its **concrete type**: the type implements [`Extensible`] and
//!   carries an [`Extension`] field. The proxy is another value of the same
//!   type whose methods run through the interceptor chain and land on the
//!   real target, so `Arc<ConcreteType>` handles keep working.
//!
//! A [`Component`] remembers which of the two the target supports so that
//! the proxy factory can choose at runtime.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::chain::AdvisorChain;
use super::proxy::ProxyStrategy;
use super::signature::TargetType;
use crate::error::ProxyError;

/// Declared type of a value, available through trait objects.
///
/// Implemented for every sized `'static` type; add it as a supertrait of a
/// capability trait so that `dyn Trait` reports the implementing type.
pub trait Target {
    fn target_type(&self) -> TargetType;
}

impl<T: 'static> Target for T {
    fn target_type(&self) -> TargetType {
        TargetType::of::<T>()
    }
}

/// A capability set that has a forwarding proxy.
///
/// Implemented on the trait object type:
///
/// ```rust,ignore
/// impl Capability for dyn OrderRepository {
///     const METHODS: &'static [&'static str] = &["save"];
///
///     fn proxy(target: Arc<Self>, chain: AdvisorChain) -> Arc<Self> {
///         Arc::new(OrderRepositoryProxy { target, chain })
///     }
/// }
/// ```
pub trait Capability: Target + Send + Sync + 'static {
    /// Names of the methods callers can reach through the capability set.
    const METHODS: &'static [&'static str];

    /// Wrap `target` so that every method runs through `chain`.
    fn proxy(target: Arc<Self>, chain: AdvisorChain) -> Arc<Self>;
}

/// A concrete type with an extension point for an interceptor chain.
///
/// Public methods route through the extension:
///
/// ```rust,ignore
/// pub fn save(&self, item_id: &str) -> Result<(), OrderError> {
///     self.extension.call(self, "save", &[&item_id], |repo| repo.store(item_id))
/// }
/// ```
pub trait Extensible: Send + Sync + Sized + 'static {
    /// Names of the methods routed through the extension point.
    const METHODS: &'static [&'static str];

    fn extension(&self) -> &Extension<Self>;

    /// Build the value that will stand in for `target`.
    ///
    /// The result must carry a fresh extension. Its own state is never
    /// read by proxied methods, but constructors that need arguments may
    /// take them from `target`. Types that cannot be built this way return
    /// [`ProxyError::NoConstructionPath`].
    fn construct(target: &Self) -> Result<Self, ProxyError>;
}

struct Delegate<T> {
    target: Arc<T>,
    chain: AdvisorChain,
}

/// Extension point carried by an [`Extensible`] type.
///
/// Empty on ordinary values; on a proxy it holds the real target and the
/// interceptor chain.
pub struct Extension<T> {
    delegate: OnceCell<Delegate<T>>,
}

impl<T> Extension<T> {
    pub fn new() -> Self {
        Self {
            delegate: OnceCell::new(),
        }
    }

    /// Check whether this value is a proxy.
    pub fn is_extended(&self) -> bool {
        self.delegate.get().is_some()
    }

    /// The interceptor chain, when this value is a proxy.
    pub fn chain(&self) -> Option<&AdvisorChain> {
        self.delegate.get().map(|delegate| &delegate.chain)
    }
}

impl<T: Extensible> Extension<T> {
    fn install(&self, target: Arc<T>, chain: AdvisorChain) -> Result<(), ProxyError> {
        self.delegate
            .set(Delegate { target, chain })
            .map_err(|_| ProxyError::AlreadyExtended(TargetType::of::<T>().to_string()))
    }

    /// Run `body` on the real target through the chain, or on `this` when
    /// this value is not a proxy.
    ///
    /// The real target may itself be a proxy; its own chain then runs
    /// inside this one.
    pub fn call<R, E, F>(&self, this: &T, method: &'static str, arguments: &[&dyn fmt::Debug], body: F) -> Result<R, E>
    where
        R: 'static,
        E: Error + Send + Sync + 'static,
        F: FnOnce(&T) -> Result<R, E>,
    {
        match self.delegate.get() {
            Some(delegate) => {
                let target = delegate.target.as_ref();
                delegate.chain.invoke(method, arguments, || {
                    target.extension().call(target, method, arguments, body)
                })
            }
            None => body(this),
        }
    }

    /// [`call`](Self::call) for methods that cannot fail.
    pub fn call_infallible<R, F>(&self, this: &T, method: &'static str, arguments: &[&dyn fmt::Debug], body: F) -> R
    where
        R: 'static,
        F: FnOnce(&T) -> R,
    {
        match self.delegate.get() {
            Some(delegate) => {
                let target = delegate.target.as_ref();
                delegate.chain.invoke_infallible(method, arguments, || {
                    target.extension().call_infallible(target, method, arguments, body)
                })
            }
            None => body(this),
        }
    }
}

impl<T> Default for Extension<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Extension<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("chain", &self.chain())
            .finish()
    }
}

/// Build a concrete proxy for `target`.
fn extend<T: Extensible>(target: &Arc<T>, chain: AdvisorChain) -> Result<Arc<T>, ProxyError> {
    let shell = T::construct(target)?;
    shell.extension().install(Arc::clone(target), chain)?;
    Ok(Arc::new(shell))
}

type Weaver = Arc<dyn Fn(AdvisorChain) -> Result<Component, ProxyError> + Send + Sync>;
type View = Arc<dyn Any + Send + Sync>;

/// A managed object, type-erased, plus the ways it can be proxied.
///
/// Callers read it back through [`get`](Self::get) with either the concrete
/// type or a capability trait object, whichever the component exposes.
#[derive(Clone)]
pub struct Component {
    target_type: TargetType,
    methods: &'static [&'static str],
    views: HashMap<TypeId, View>,
    capability: Option<Weaver>,
    concrete: Option<Weaver>,
    strategy: Option<ProxyStrategy>,
}

impl Component {
    /// A target known only through the capability set `C`.
    pub fn from_capability<C: ?Sized + Capability>(target: Arc<C>) -> Self {
        let target_type = (*target).target_type();
        Self::with_capability(target, target_type, None)
    }

    /// A concrete target with an extension point.
    pub fn from_extensible<T: Extensible>(target: Arc<T>) -> Self {
        Self::with_concrete(target, None)
    }

    /// A concrete target with an extension point that also implements `C`.
    ///
    /// `upcast` converts the concrete handle: `|t| t as Arc<dyn Trait>`.
    pub fn from_implementation<T, C>(target: Arc<T>, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        T: Extensible,
        C: ?Sized + Capability,
    {
        Self::with_implementation(target, upcast, None)
    }

    /// A target that cannot be proxied at all.
    pub fn sealed<T: Send + Sync + 'static>(target: Arc<T>) -> Self {
        let mut views = HashMap::new();
        views.insert(TypeId::of::<Arc<T>>(), Arc::new(target) as View);
        Self {
            target_type: TargetType::of::<T>(),
            methods: &[],
            views,
            capability: None,
            concrete: None,
            strategy: None,
        }
    }

    fn with_capability<C: ?Sized + Capability>(
        target: Arc<C>,
        target_type: TargetType,
        strategy: Option<ProxyStrategy>,
    ) -> Self {
        let mut views = HashMap::new();
        views.insert(TypeId::of::<Arc<C>>(), Arc::new(Arc::clone(&target)) as View);

        let proxied_type = target_type.clone();
        let capability: Weaver = Arc::new(move |chain| {
            let proxy = C::proxy(Arc::clone(&target), chain);
            Ok(Self::with_capability(
                proxy,
                proxied_type.clone(),
                Some(ProxyStrategy::Capability),
            ))
        });

        Self {
            target_type,
            methods: C::METHODS,
            views,
            capability: Some(capability),
            concrete: None,
            strategy,
        }
    }

    fn with_concrete<T: Extensible>(target: Arc<T>, strategy: Option<ProxyStrategy>) -> Self {
        let mut views = HashMap::new();
        views.insert(TypeId::of::<Arc<T>>(), Arc::new(Arc::clone(&target)) as View);

        let concrete: Weaver = Arc::new(move |chain| {
            let proxy = extend(&target, chain)?;
            Ok(Self::with_concrete(proxy, Some(ProxyStrategy::Concrete)))
        });

        Self {
            target_type: TargetType::of::<T>(),
            methods: T::METHODS,
            views,
            capability: None,
            concrete: Some(concrete),
            strategy,
        }
    }

    fn with_implementation<T, C>(
        target: Arc<T>,
        upcast: fn(Arc<T>) -> Arc<C>,
        strategy: Option<ProxyStrategy>,
    ) -> Self
    where
        T: Extensible,
        C: ?Sized + Capability,
    {
        let mut component =
            Self::with_capability(upcast(Arc::clone(&target)), TargetType::of::<T>(), strategy);
        component.methods = T::METHODS;
        component
            .views
            .insert(TypeId::of::<Arc<T>>(), Arc::new(Arc::clone(&target)) as View);
        component.concrete = Some(Arc::new(move |chain| {
            let proxy = extend(&target, chain)?;
            Ok(Self::with_implementation(
                proxy,
                upcast,
                Some(ProxyStrategy::Concrete),
            ))
        }));
        component
    }

    /// The component as `Arc<X>`, if it exposes `X`.
    pub fn get<X: ?Sized + 'static>(&self) -> Option<Arc<X>> {
        self.views
            .get(&TypeId::of::<Arc<X>>())?
            .downcast_ref::<Arc<X>>()
            .cloned()
    }

    /// Declared type of the underlying target, also for proxies.
    pub fn target_type(&self) -> &TargetType {
        &self.target_type
    }

    /// Method names reachable on the component.
    pub fn methods(&self) -> &'static [&'static str] {
        self.methods
    }

    pub fn has_capability(&self) -> bool {
        self.capability.is_some()
    }

    pub fn is_extensible(&self) -> bool {
        self.concrete.is_some()
    }

    pub fn is_proxyable(&self) -> bool {
        self.has_capability() || self.is_extensible()
    }

    /// The strategy that built this component, if it is a proxy.
    pub fn strategy(&self) -> Option<ProxyStrategy> {
        self.strategy
    }

    pub fn is_proxy(&self) -> bool {
        self.strategy.is_some()
    }

    pub fn is_capability_proxy(&self) -> bool {
        self.strategy == Some(ProxyStrategy::Capability)
    }

    pub fn is_concrete_proxy(&self) -> bool {
        self.strategy == Some(ProxyStrategy::Concrete)
    }

    pub(crate) fn weaver(&self, strategy: ProxyStrategy) -> Option<&Weaver> {
        match strategy {
            ProxyStrategy::Capability => self.capability.as_ref(),
            ProxyStrategy::Concrete => self.concrete.as_ref(),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("target_type", &self.target_type)
            .field("methods", &self.methods)
            .field("capability", &self.has_capability())
            .field("extensible", &self.is_extensible())
            .field("strategy", &self.strategy)
            .finish()
    }
}
