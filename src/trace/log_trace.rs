// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Nested begin/end tracing bound to the current call stack.

use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::id::TraceId;

/// Indent unit repeated once per nesting level.
pub const DEFAULT_INDENT: &str = "|   ";

/// Handle returned by [`LogTrace::begin`], consumed by `end` or `exception`.
#[derive(Debug)]
pub struct TraceStatus {
    trace_id: TraceId,
    start: Instant,
    message: String,
}

impl TraceStatus {
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    /// Time since the matching `begin`.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Destination for rendered trace lines.
pub trait TraceWriter: Send + Sync {
    fn write(&self, line: &str);
}

/// Writes trace lines as `info` events on the `weave::trace` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWriter;

impl TraceWriter for TracingWriter {
    fn write(&self, line: &str) {
        info!(target: "weave::trace", "{}", line);
    }
}

/// Keeps trace lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return every line written so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl TraceWriter for MemoryWriter {
    fn write(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

/// Begin/end tracing of nested calls.
///
/// Every `begin` must be paired with exactly one `end` or `exception` on
/// the same call stack. Pairing is enforced by [`TraceStatus`] being
/// consumed by value.
pub trait LogTrace: Send + Sync {
    /// Open a trace entry for `message`.
    fn begin(&self, message: &str) -> TraceStatus;

    /// Close `status` normally.
    fn end(&self, status: TraceStatus);

    /// Close `status` with `error`. The caller re-raises the error.
    fn exception(&self, status: TraceStatus, error: &(dyn Error + 'static));
}

/// Trace contexts of one call stack, keyed by log-trace instance.
type Contexts = HashMap<u64, TraceId>;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static THREAD_CONTEXTS: RefCell<Contexts> = RefCell::new(HashMap::new());
}

tokio::task_local! {
    static TASK_CONTEXTS: Arc<Mutex<Contexts>>;
}

/// Run `future` with trace contexts private to this task.
///
/// Outside of a scope, contexts are per thread. Inside, they follow the
/// task across worker threads and are invisible to other tasks.
pub async fn scope<F: Future>(future: F) -> F::Output {
    TASK_CONTEXTS
        .scope(Arc::new(Mutex::new(HashMap::new())), future)
        .await
}

fn with_contexts<R>(f: impl FnOnce(&mut Contexts) -> R) -> R {
    match TASK_CONTEXTS.try_with(Arc::clone) {
        Ok(shared) => f(&mut shared.lock().unwrap_or_else(PoisonError::into_inner)),
        Err(_) => THREAD_CONTEXTS.with(|cell| f(&mut cell.borrow_mut())),
    }
}

/// [`LogTrace`] whose depth and level id live in call-stack-local storage.
pub struct ThreadLocalLogTrace {
    key: u64,
    indent: String,
    writer: Arc<dyn TraceWriter>,
}

impl ThreadLocalLogTrace {
    /// Trace into `tracing` with the default indent.
    pub fn new() -> Self {
        Self::with_writer(Arc::new(TracingWriter))
    }

    pub fn with_writer(writer: Arc<dyn TraceWriter>) -> Self {
        Self {
            key: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            indent: DEFAULT_INDENT.to_string(),
            writer,
        }
    }

    /// Set the indent unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// The level id of the open top-level call on this call stack, if any.
    pub fn trace_id(&self) -> Option<TraceId> {
        with_contexts(|contexts| contexts.get(&self.key).cloned())
    }

    /// Number of open statuses on this call stack.
    pub fn depth(&self) -> usize {
        self.trace_id().map_or(0, |id| id.level() + 1)
    }

    fn prefix(&self, trace_id: &TraceId) -> String {
        self.indent.repeat(trace_id.level())
    }

    fn sync_trace_id(&self) -> TraceId {
        with_contexts(|contexts| {
            let next = match contexts.get(&self.key) {
                Some(current) => current.next_level(),
                None => TraceId::new(),
            };
            contexts.insert(self.key, next.clone());
            next
        })
    }

    /// Pop `trace_id` if it is the innermost open level on this call stack.
    fn release_trace_id(&self, trace_id: &TraceId) -> bool {
        with_contexts(|contexts| match contexts.get(&self.key) {
            Some(current) if current == trace_id => {
                if current.is_first_level() {
                    contexts.remove(&self.key);
                } else {
                    let previous = current.previous_level();
                    contexts.insert(self.key, previous);
                }
                true
            }
            _ => false,
        })
    }

    fn complete(&self, status: TraceStatus, error: Option<&(dyn Error + 'static)>) {
        if !self.release_trace_id(&status.trace_id) {
            warn!(
                trace_id = %status.trace_id,
                level = status.trace_id.level(),
                message = %status.message,
                "Trace status does not belong to the current call stack, ignoring"
            );
            return;
        }

        let elapsed_ms = status.elapsed().as_millis();
        let prefix = self.prefix(&status.trace_id);
        let line = match error {
            Some(err) => format!(
                "{}{} {} ex={} time={}ms",
                prefix, status.trace_id, status.message, err, elapsed_ms
            ),
            None => format!(
                "{}{} {} time={}ms",
                prefix, status.trace_id, status.message, elapsed_ms
            ),
        };
        self.writer.write(&line);
    }
}

impl Default for ThreadLocalLogTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTrace for ThreadLocalLogTrace {
    fn begin(&self, message: &str) -> TraceStatus {
        let trace_id = self.sync_trace_id();
        self.writer
            .write(&format!("{}{} {}", self.prefix(&trace_id), trace_id, message));

        TraceStatus {
            trace_id,
            start: Instant::now(),
            message: message.to_string(),
        }
    }

    fn end(&self, status: TraceStatus) {
        self.complete(status, None);
    }

    fn exception(&self, status: TraceStatus, error: &(dyn Error + 'static)) {
        self.complete(status, Some(error));
    }
}
