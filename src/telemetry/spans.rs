// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Span helpers for intercepted calls.

use std::time::{Duration, Instant};
use tracing::{info_span, Span};

/// RAII timer for one intercepted call.
///
/// Opens a `method` span; [`finish`](Self::finish) records the duration on
/// the span and, with the `telemetry` feature, in the global metrics.
pub struct MethodSpan {
    #[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
    method: String,
    start: Instant,
    span: Span,
}

impl MethodSpan {
    pub fn start(method: &str) -> Self {
        let span = info_span!(
            "method",
            method = %method,
            duration_ms = tracing::field::Empty,
            success = tracing::field::Empty,
        );

        Self {
            method: method.to_string(),
            start: Instant::now(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Close the span and return the measured duration.
    pub fn finish(self, success: bool) -> Duration {
        let duration = self.start.elapsed();
        self.span.record("duration_ms", duration.as_secs_f64() * 1000.0);
        self.span.record("success", success);

        #[cfg(feature = "telemetry")]
        super::metrics::GLOBAL_METRICS.record_method(&self.method, duration, success);

        duration
    }
}

/// Start a [`MethodSpan`].
///
/// ```rust,ignore
/// let span = timed!("OrderRepositoryV1Impl.save()");
/// let result = repository.save(item_id);
/// span.finish(result.is_ok());
/// ```
#[macro_export]
macro_rules! timed {
    ($method:expr) => {
        $crate::telemetry::MethodSpan::start($method)
    };
}

#[allow(unused_imports)]
pub use timed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_span_lifecycle() {
        let span = MethodSpan::start("Spans.lifecycle()");
        std::thread::sleep(Duration::from_millis(2));
        assert!(span.elapsed() >= Duration::from_millis(2));
        let duration = span.finish(true);
        assert!(duration >= Duration::from_millis(2));
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn test_method_span_records_metrics() {
        let span = timed!("Spans.records_metrics()");
        span.finish(false);
        let metrics = crate::telemetry::GLOBAL_METRICS
            .method_metrics("Spans.records_metrics()")
            .unwrap();
        assert_eq!(metrics.failures, 1);
    }
}
