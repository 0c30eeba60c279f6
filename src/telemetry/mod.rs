// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Diagnostics and metrics.
//!
//! - **Logging**: `tracing` events everywhere, installed by
//!   [`init_telemetry`]. Trace lines from the log-trace advice use the
//!   `weave::trace` target.
//! - **Metrics**: per-method counters and latency histograms, recorded by
//!   [`MethodSpan`] when the `telemetry` feature is on.
//!
//! ```rust,ignore
//! use weave::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::default())?;
//! ```

mod init;
pub mod metrics;
mod spans;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard, TRACE_TARGET};
pub use metrics::{Histogram, MethodMetrics, Metrics, MetricsSnapshot, GLOBAL_METRICS};
pub use spans::MethodSpan;
