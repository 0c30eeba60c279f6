// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-process metrics for intercepted methods.
//!
//! Keyed by the method's short form (`OrderServiceV1Impl.order_item()`).

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// Global metrics instance.
pub static GLOBAL_METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

#[derive(Debug)]
pub struct Metrics {
    methods: RwLock<BTreeMap<String, MethodMetrics>>,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            methods: RwLock::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record one completed call of `method`.
    pub fn record_method(&self, method: &str, duration: Duration, success: bool) {
        self.methods
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(method.to_string())
            .or_default()
            .record(duration, success);
    }

    pub fn method_metrics(&self, method: &str) -> Option<MethodMetrics> {
        self.read().get(method).cloned()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            methods: self.read().clone(),
            uptime: self.uptime(),
        }
    }

    pub fn reset(&self) {
        self.methods
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, MethodMetrics>> {
        self.methods.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters and latency distribution for one method.
#[derive(Debug, Clone)]
pub struct MethodMetrics {
    pub invocations: u64,
    pub successes: u64,
    pub failures: u64,
    pub total_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub histogram: Histogram,
}

impl MethodMetrics {
    pub fn new() -> Self {
        Self {
            invocations: 0,
            successes: 0,
            failures: 0,
            total_duration: Duration::ZERO,
            min_duration: Duration::MAX,
            max_duration: Duration::ZERO,
            histogram: Histogram::default(),
        }
    }

    pub fn record(&mut self, duration: Duration, success: bool) {
        self.invocations += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.total_duration += duration;
        self.min_duration = self.min_duration.min(duration);
        self.max_duration = self.max_duration.max(duration);
        self.histogram.record(duration);
    }

    pub fn avg_duration(&self) -> Duration {
        match u32::try_from(self.invocations) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_duration / n,
            Err(_) => Duration::from_secs_f64(
                self.total_duration.as_secs_f64() / self.invocations as f64,
            ),
        }
    }

    /// Fraction of calls that returned normally, 1.0 when never called.
    pub fn success_rate(&self) -> f64 {
        if self.invocations == 0 {
            1.0
        } else {
            self.successes as f64 / self.invocations as f64
        }
    }
}

impl Default for MethodMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency histogram over fixed bucket bounds in microseconds.
#[derive(Debug, Clone)]
pub struct Histogram {
    bounds: Vec<u64>,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn with_buckets(bounds: Vec<u64>) -> Self {
        let counts = vec![0; bounds.len() + 1];
        Self { bounds, counts }
    }

    pub fn record(&mut self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        let slot = self
            .bounds
            .iter()
            .position(|&bound| micros <= bound)
            .unwrap_or(self.bounds.len());
        self.counts[slot] += 1;
    }

    /// Counts per bucket; the last slot is the overflow bucket.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bounds(&self) -> &[u64] {
        &self.bounds
    }

    /// Upper bound of the bucket holding the `p`th percentile.
    pub fn percentile(&self, p: f64) -> Duration {
        let total: u64 = self.counts.iter().sum();
        if total == 0 {
            return Duration::ZERO;
        }

        let rank = (total as f64 * p / 100.0).ceil() as u64;
        let mut seen = 0u64;
        for (slot, &count) in self.counts.iter().enumerate() {
            seen += count;
            if seen >= rank {
                let micros = match self.bounds.get(slot) {
                    Some(&bound) => bound,
                    None => self.bounds.last().copied().unwrap_or(0) * 10,
                };
                return Duration::from_micros(micros);
            }
        }
        Duration::ZERO
    }

    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    pub fn p90(&self) -> Duration {
        self.percentile(90.0)
    }

    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

impl Default for Histogram {
    /// 10us, 100us, 1ms, 10ms, 100ms, 1s, 10s.
    fn default() -> Self {
        Self::with_buckets(vec![10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000])
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub methods: BTreeMap<String, MethodMetrics>,
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Human-readable report, one line per method.
    pub fn format_report(&self) -> String {
        let mut report = format!("=== Method Metrics ===\nUptime: {:.2?}\n", self.uptime);
        if self.methods.is_empty() {
            report.push_str("No intercepted calls recorded.\n");
            return report;
        }
        for (name, metrics) in &self.methods {
            report.push_str(&format!(
                "  {}: {} calls, {:.1}% ok, avg {:.2?}, p99 {:.2?}\n",
                name,
                metrics.invocations,
                metrics.success_rate() * 100.0,
                metrics.avg_duration(),
                metrics.histogram.p99()
            ));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_metrics() {
        let mut metrics = MethodMetrics::new();
        metrics.record(Duration::from_millis(10), true);
        metrics.record(Duration::from_millis(20), true);
        metrics.record(Duration::from_millis(30), false);

        assert_eq!(metrics.invocations, 3);
        assert_eq!(metrics.failures, 1);
        assert_eq!(metrics.avg_duration(), Duration::from_millis(20));
        assert_eq!(metrics.min_duration, Duration::from_millis(10));
        assert!((metrics.success_rate() - 0.666).abs() < 0.01);
    }

    #[test]
    fn test_histogram_buckets() {
        let mut hist = Histogram::default();
        hist.record(Duration::from_micros(5));
        hist.record(Duration::from_micros(50));
        hist.record(Duration::from_millis(5));
        hist.record(Duration::from_secs(60));

        assert_eq!(hist.counts()[0], 1);
        assert_eq!(hist.counts()[1], 1);
        assert_eq!(hist.counts()[3], 1);
        assert_eq!(hist.counts()[hist.bounds().len()], 1);
    }

    #[test]
    fn test_histogram_percentiles() {
        let mut hist = Histogram::default();
        for _ in 0..100 {
            hist.record(Duration::from_micros(500));
        }
        assert_eq!(hist.p50(), Duration::from_millis(1));
        assert_eq!(hist.p99(), Duration::from_millis(1));
        assert_eq!(Histogram::default().p90(), Duration::ZERO);
    }

    #[test]
    fn test_metrics_snapshot_and_reset() {
        let metrics = Metrics::new();
        metrics.record_method("Repo.save()", Duration::from_millis(1), true);
        metrics.record_method("Repo.save()", Duration::from_millis(3), false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.methods["Repo.save()"].invocations, 2);
        assert!(snapshot.format_report().contains("Repo.save(): 2 calls"));

        metrics.reset();
        assert!(metrics.method_metrics("Repo.save()").is_none());
        assert!(metrics.snapshot().format_report().contains("No intercepted calls"));
    }
}
