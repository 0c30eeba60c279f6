// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The interceptor chain carried by every proxy.

use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::advice::{Invocation, Raised, Returned};
use super::advisor::Advisor;
use super::signature::{MethodSignature, TargetType};

/// The ordered advisors applied to one target.
///
/// Advisors whose type filter rejected the target were dropped when the
/// chain was built. The first advisor is the outermost wrapper.
#[derive(Clone)]
pub struct AdvisorChain {
    target_type: TargetType,
    advisors: Arc<[Arc<Advisor>]>,
}

impl AdvisorChain {
    /// Keep the advisors in `advisors` whose type filter accepts `target_type`.
    pub fn new(target_type: TargetType, advisors: &[Arc<Advisor>]) -> Self {
        let eligible: Vec<Arc<Advisor>> = advisors
            .iter()
            .filter(|advisor| advisor.pointcut().accepts_type(&target_type))
            .cloned()
            .collect();

        Self {
            target_type,
            advisors: eligible.into(),
        }
    }

    pub fn target_type(&self) -> &TargetType {
        &self.target_type
    }

    pub fn advisors(&self) -> &[Arc<Advisor>] {
        &self.advisors
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }

    /// Check whether any advisor would fire for `method`.
    pub fn intercepts(&self, method: &str) -> bool {
        self.advisors
            .iter()
            .any(|advisor| advisor.pointcut().matches_method(method))
    }

    /// Run `call` through every advisor matching `method`.
    ///
    /// Without a matching advisor `call` runs directly. Whatever `call`
    /// returns or raises reaches the caller unchanged.
    pub fn invoke<T, E, F>(&self, method: &'static str, arguments: &[&dyn fmt::Debug], call: F) -> Result<T, E>
    where
        T: 'static,
        E: Error + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        let matched: Vec<&Advisor> = self
            .advisors
            .iter()
            .filter(|advisor| advisor.pointcut().matches_method(method))
            .map(Arc::as_ref)
            .collect();

        if matched.is_empty() {
            return call();
        }

        let signature = MethodSignature::new(self.target_type.clone(), method);
        trace!(method = %signature, advisors = matched.len(), "Entering interceptor chain");

        let terminal = move || match call() {
            Ok(value) => Ok(Returned::new(value)),
            Err(error) => Err(Raised::new(error)),
        };
        let invocation = Invocation::new(&signature, arguments, &matched, Box::new(terminal));

        match invocation.proceed() {
            Ok(returned) => match returned.into_value::<T>() {
                Some(value) => Ok(value),
                None => unreachable!("interceptor chain returned a foreign value for {}", signature),
            },
            Err(raised) => match raised.into_error::<E>() {
                Some(error) => Err(error),
                None => unreachable!("interceptor chain raised a foreign error for {}", signature),
            },
        }
    }

    /// [`invoke`](Self::invoke) for methods that cannot fail.
    pub fn invoke_infallible<T, F>(&self, method: &'static str, arguments: &[&dyn fmt::Debug], call: F) -> T
    where
        T: 'static,
        F: FnOnce() -> T,
    {
        match self.invoke::<T, Infallible, _>(method, arguments, || Ok(call())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl fmt::Debug for AdvisorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.advisors.iter().map(|a| a.name()).collect();
        f.debug_struct("AdvisorChain")
            .field("target_type", &self.target_type)
            .field("advisors", &names)
            .finish()
    }
}
