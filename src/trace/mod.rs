// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-call-stack trace context.
//!
//! A [`LogTrace`] renders one line when a traced call begins and one when
//! it ends or fails. Nested calls on the same call stack share the level
//! id of the outermost call and are indented by their depth:
//!
//! ```text
//! 3f2a9c1e OrderControllerV1Impl.request()
//! |   3f2a9c1e OrderServiceV1Impl.order_item()
//! |   |   3f2a9c1e OrderRepositoryV1Impl.save()
//! |   |   3f2a9c1e OrderRepositoryV1Impl.save() time=1001ms
//! |   3f2a9c1e OrderServiceV1Impl.order_item() time=1001ms
//! 3f2a9c1e OrderControllerV1Impl.request() time=1002ms
//! ```
//!
//! Contexts are thread-local; wrap a future in [`scope`] to give a tokio
//! task its own context instead.

mod id;
mod log_trace;

pub use id::TraceId;
pub use log_trace::{
    scope, LogTrace, MemoryWriter, ThreadLocalLogTrace, TraceStatus, TraceWriter, TracingWriter,
    DEFAULT_INDENT,
};
