// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Advisors pair a pointcut with the advice it guards.

use std::fmt;
use std::sync::Arc;

use super::advice::Advice;
use super::pointcut::Pointcut;

/// An immutable (pointcut, advice) pair, built once and shared by every
/// proxy and every call.
pub struct Advisor {
    name: String,
    pointcut: Pointcut,
    advice: Arc<dyn Advice>,
}

impl Advisor {
    pub fn new(name: impl Into<String>, pointcut: Pointcut, advice: impl Advice + 'static) -> Self {
        Self::from_shared(name, pointcut, Arc::new(advice))
    }

    /// Build from an advice that is already shared elsewhere.
    pub fn from_shared(name: impl Into<String>, pointcut: Pointcut, advice: Arc<dyn Advice>) -> Self {
        Self {
            name: name.into(),
            pointcut,
            advice,
        }
    }

    /// An advisor whose advice applies to every method of every type.
    pub fn always(name: impl Into<String>, advice: impl Advice + 'static) -> Self {
        Self::new(name, Pointcut::always(), advice)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    pub fn advice(&self) -> &dyn Advice {
        self.advice.as_ref()
    }

    /// Wrap in an `Arc` for sharing between proxies.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for Advisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advisor")
            .field("name", &self.name)
            .field("pointcut", &self.pointcut)
            .finish_non_exhaustive()
    }
}
