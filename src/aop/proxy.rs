// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Proxy construction.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::advice::Advice;
use super::advisor::Advisor;
use super::chain::AdvisorChain;
use super::component::Component;
use crate::error::ProxyError;

/// How a proxy stands in for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProxyStrategy {
    /// A forwarding type implementing the target's capability trait.
    Capability,
    /// A second value of the target's own type, routed via its extension.
    Concrete,
}

impl fmt::Display for ProxyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyStrategy::Capability => write!(f, "capability"),
            ProxyStrategy::Concrete => write!(f, "concrete"),
        }
    }
}

/// Pick the strategy for `component`.
///
/// Capability proxies are preferred when the component has a capability
/// set, unless the concrete strategy is forced.
pub fn select_strategy(component: &Component, force_concrete: bool) -> Result<ProxyStrategy, ProxyError> {
    let target = component.target_type();
    match (component.has_capability(), component.is_extensible()) {
        (false, false) => Err(ProxyError::Unproxyable(target.to_string())),
        (_, true) if force_concrete => Ok(ProxyStrategy::Concrete),
        (true, false) if force_concrete => Err(ProxyError::StrategyUnavailable(target.to_string())),
        (true, _) => Ok(ProxyStrategy::Capability),
        (false, true) => Ok(ProxyStrategy::Concrete),
    }
}

/// Build a proxy of `component` carrying the eligible subset of `advisors`.
pub(crate) fn weave(
    component: &Component,
    advisors: &[Arc<Advisor>],
    force_concrete: bool,
) -> Result<Component, ProxyError> {
    let strategy = select_strategy(component, force_concrete)?;
    let chain = AdvisorChain::new(component.target_type().clone(), advisors);
    let eligible = chain.advisors().len();

    let weaver = component
        .weaver(strategy)
        .ok_or_else(|| ProxyError::StrategyUnavailable(component.target_type().to_string()))?;
    let proxy = weaver(chain)?;

    debug!(
        target_type = %component.target_type(),
        strategy = %strategy,
        advisors = eligible,
        "Created proxy"
    );
    Ok(proxy)
}

/// Builds one proxy for one target with an ordered list of advisors.
///
/// The first advisor added is the outermost wrapper.
///
/// # Example
///
/// ```rust,ignore
/// let proxy = ProxyFactory::new(Component::from_capability::<dyn OrderRepositoryV1>(repo))
///     .with_advice(LogTraceAdvice::new(log_trace))
///     .proxy()?;
/// let repo = proxy.get::<dyn OrderRepositoryV1>().unwrap();
/// ```
pub struct ProxyFactory {
    target: Component,
    advisors: Vec<Arc<Advisor>>,
    force_concrete: bool,
}

impl ProxyFactory {
    pub fn new(target: Component) -> Self {
        Self {
            target,
            advisors: Vec::new(),
            force_concrete: false,
        }
    }

    pub fn add_advisor(&mut self, advisor: impl Into<Arc<Advisor>>) {
        self.advisors.push(advisor.into());
    }

    /// Add an advice that applies to every method.
    pub fn add_advice(&mut self, advice: impl Advice + 'static) {
        let name = format!("advice-{}", self.advisors.len() + 1);
        self.add_advisor(Advisor::always(name, advice));
    }

    pub fn set_force_concrete_strategy(&mut self, force: bool) {
        self.force_concrete = force;
    }

    pub fn with_advisor(mut self, advisor: impl Into<Arc<Advisor>>) -> Self {
        self.add_advisor(advisor);
        self
    }

    pub fn with_advisors(mut self, advisors: impl IntoIterator<Item = Arc<Advisor>>) -> Self {
        self.advisors.extend(advisors);
        self
    }

    pub fn with_advice(mut self, advice: impl Advice + 'static) -> Self {
        self.add_advice(advice);
        self
    }

    pub fn with_force_concrete_strategy(mut self, force: bool) -> Self {
        self.force_concrete = force;
        self
    }

    pub fn advisors(&self) -> &[Arc<Advisor>] {
        &self.advisors
    }

    /// The strategy [`proxy`](Self::proxy) would use.
    pub fn strategy(&self) -> Result<ProxyStrategy, ProxyError> {
        select_strategy(&self.target, self.force_concrete)
    }

    pub fn proxy(self) -> Result<Component, ProxyError> {
        weave(&self.target, &self.advisors, self.force_concrete)
    }
}

impl fmt::Debug for ProxyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyFactory")
            .field("target", &self.target)
            .field("advisors", &self.advisors)
            .field("force_concrete", &self.force_concrete)
            .finish()
    }
}

/// Proxy `target` with `advisors` using the default strategy choice.
pub fn create_proxy(target: Component, advisors: &[Arc<Advisor>]) -> Result<Component, ProxyError> {
    ProxyFactory::new(target)
        .with_advisors(advisors.iter().cloned())
        .proxy()
}
