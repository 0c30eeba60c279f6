// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Method interception.
//!
//! The pieces, from the inside out:
//!
//! - [`Advice`]: behaviour run around a method call
//! - [`Pointcut`]: which types and methods an advice covers
//! - [`Advisor`]: a shared (pointcut, advice) pair
//! - [`AdvisorChain`]: the advisors applied to one target, innermost last
//! - [`Component`]: a type-erased target and the ways it can be proxied
//! - [`ProxyFactory`]: builds one proxy for one target
//! - [`AutoProxyHook`]: substitutes proxies for components as a container
//!   constructs them
//!
//! # Writing a proxyable capability set
//!
//! ```rust,ignore
//! pub trait OrderRepository: Target + Send + Sync {
//!     fn save(&self, item_id: &str) -> Result<(), OrderError>;
//! }
//!
//! pub struct OrderRepositoryProxy {
//!     target: Arc<dyn OrderRepository>,
//!     chain: AdvisorChain,
//! }
//!
//! impl OrderRepository for OrderRepositoryProxy {
//!     fn save(&self, item_id: &str) -> Result<(), OrderError> {
//!         self.chain.invoke("save", &[&item_id], || self.target.save(item_id))
//!     }
//! }
//!
//! impl Capability for dyn OrderRepository {
//!     const METHODS: &'static [&'static str] = &["save"];
//!
//!     fn proxy(target: Arc<Self>, chain: AdvisorChain) -> Arc<Self> {
//!         Arc::new(OrderRepositoryProxy { target, chain })
//!     }
//! }
//! ```

pub mod advice;
pub mod advisor;
pub mod auto_proxy;
pub mod chain;
pub mod component;
pub mod pointcut;
pub mod proxy;
pub mod signature;

pub use advice::{Advice, Invocation, Outcome, Raised, Returned};
pub use advisor::Advisor;
pub use auto_proxy::{AutoProxyHook, PostProcessor, Selection};
pub use chain::AdvisorChain;
pub use component::{Capability, Component, Extensible, Extension, Target};
pub use pointcut::{Pointcut, ScopeFilter};
pub use proxy::{create_proxy, select_strategy, ProxyFactory, ProxyStrategy};
pub use signature::{MethodSignature, TargetType};
