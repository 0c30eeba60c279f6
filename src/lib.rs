// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Weave - method interception and proxy composition.
//!
//! Cross-cutting behaviour (tracing, timing) is attached to components
//! without touching their code: an [`aop::Advisor`] pairs a
//! [`aop::Pointcut`] deciding *where* with an [`aop::Advice`] deciding
//! *what*, and a proxy routes each call through the advisors that apply.
//!
//! # Architecture
//!
//! - [`pattern`] - Simple method-name patterns (`save*`, `*_item`, `*_id`)
//! - [`aop`] - Pointcuts, advices, advisor chains, proxies and auto-proxying
//! - [`trace`] - Per-call-stack nested begin/end trace context
//! - [`advices`] - Ready-made log-trace and timing advices
//! - [`container`] - Named component registry running post-processors
//! - [`config`] - Configuration loading and merging
//! - [`telemetry`] - Tracing subscriber setup, method spans and metrics
//! - [`app`] - Sample order application wired through the container
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use weave::aop::{Advisor, Pointcut, ProxyFactory};
//! use weave::advices::LogTraceAdvice;
//! use weave::trace::ThreadLocalLogTrace;
//!
//! let trace = Arc::new(ThreadLocalLogTrace::new());
//! let advisor = Advisor::new(
//!     "log-trace",
//!     Pointcut::name_match(["save*"])?,
//!     LogTraceAdvice::new(trace),
//! );
//!
//! let proxy = ProxyFactory::new(component)
//!     .with_advisor(advisor)
//!     .proxy()?;
//! let repository = proxy.get::<dyn OrderRepositoryV1>().unwrap();
//! repository.save("item-1")?;
//! ```

pub mod advices;
pub mod aop;
pub mod app;
pub mod config;
pub mod container;
pub mod error;
pub mod pattern;
pub mod telemetry;
pub mod trace;

// Re-export commonly used types at crate root
pub use aop::{
    Advice, Advisor, AdvisorChain, AutoProxyHook, Capability, Component, Extensible, Extension,
    Invocation, Outcome, Pointcut, PostProcessor, ProxyFactory, ProxyStrategy, ScopeFilter,
};
pub use container::Container;
pub use error::{ConfigError, ContainerError, PatternError, ProxyError, Result};
pub use pattern::{Pattern, PatternSet};
pub use trace::{LogTrace, ThreadLocalLogTrace, TraceStatus};

/// Weave version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
