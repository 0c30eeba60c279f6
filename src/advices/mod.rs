// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Ready-made advices.

mod log_trace;
mod time;

pub use log_trace::LogTraceAdvice;
pub use time::TimeAdvice;
