// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sample order flow: controller → service → repository.
//!
//! Two families with the same behaviour: [`v1`] is used through capability
//! traits, [`v2`] through concrete types only.

use std::thread;
use std::time::Duration;

use thiserror::Error;

pub mod v1;
pub mod v2;

/// Item id that makes the repository fail.
pub const FAILING_ITEM_ID: &str = "ex";

/// Simulated storage latency used by the demo.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("illegal state: {0}")]
    IllegalState(String),
}

/// Shared body of both repositories.
fn store(item_id: &str, latency: Duration) -> Result<(), OrderError> {
    if item_id == FAILING_ITEM_ID {
        return Err(OrderError::IllegalState(format!(
            "cannot save item {:?}",
            item_id
        )));
    }
    if !latency.is_zero() {
        thread::sleep(latency);
    }
    Ok(())
}
