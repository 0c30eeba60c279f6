// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sample application wired through the container and the auto-proxy hook.

pub mod demo;
pub mod infra;
pub mod orders;
pub mod wiring;

/// Module path of the sample application.
pub const APP_SCOPE: &str = module_path!();

pub use demo::{run_demo, DemoCall};
pub use wiring::{build_container, log_trace_aspect, Family};
