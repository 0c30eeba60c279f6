// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

use tracing::info;

use crate::aop::{Advice, Invocation, Outcome};
use crate::telemetry::MethodSpan;

/// Measures each call, logs the elapsed time and records method metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeAdvice;

impl TimeAdvice {
    pub fn new() -> Self {
        Self
    }
}

impl Advice for TimeAdvice {
    fn invoke<'a>(&self, invocation: Invocation<'a>) -> Outcome<'a> {
        let method = invocation.signature().short_string();
        info!(method = %method, "execute time advice");

        let span = MethodSpan::start(&method);
        let outcome = {
            let _entered = span.enter();
            invocation.proceed()
        };
        let elapsed = span.finish(outcome.is_ok());

        info!(method = %method, result_time_ms = elapsed.as_millis() as u64, "time advice finished");
        outcome
    }
}
