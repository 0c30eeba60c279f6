// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Component registration for the sample application.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::infra::Cache;
use super::orders::v1::{
    OrderControllerV1, OrderControllerV1Impl, OrderRepositoryV1, OrderRepositoryV1Impl,
    OrderServiceV1, OrderServiceV1Impl,
};
use super::orders::v2::{OrderControllerV2, OrderRepositoryV2, OrderServiceV2};
use super::APP_SCOPE;
use crate::advices::LogTraceAdvice;
use crate::aop::{Advisor, Component, Pointcut};
use crate::config::ResolvedConfig;
use crate::container::Container;
use crate::error::{ContainerError, PatternError};
use crate::trace::LogTrace;

pub const ORDER_REPOSITORY_V1: &str = "orderRepositoryV1";
pub const ORDER_SERVICE_V1: &str = "orderServiceV1";
pub const ORDER_CONTROLLER_V1: &str = "orderControllerV1";
pub const ORDER_REPOSITORY_V2: &str = "orderRepositoryV2";
pub const ORDER_SERVICE_V2: &str = "orderServiceV2";
pub const ORDER_CONTROLLER_V2: &str = "orderControllerV2";
pub const CACHE: &str = "cache";

/// Which order families to register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    V1,
    V2,
    #[default]
    All,
}

impl Family {
    pub fn includes_v1(self) -> bool {
        matches!(self, Family::V1 | Family::All)
    }

    pub fn includes_v2(self) -> bool {
        matches!(self, Family::V2 | Family::All)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V1 => write!(f, "v1"),
            Family::V2 => write!(f, "v2"),
            Family::All => write!(f, "all"),
        }
    }
}

/// Log-trace advice over the whole application except `no_log`.
pub fn log_trace_aspect(log_trace: Arc<dyn LogTrace>) -> Result<Advisor, PatternError> {
    let pointcut = Pointcut::within(APP_SCOPE).excluding(["no_log"])?;
    Ok(Advisor::new(
        "log-trace-aspect",
        pointcut,
        LogTraceAdvice::new(log_trace),
    ))
}

pub fn register_v1(container: &mut Container, latency: Duration) -> Result<(), ContainerError> {
    container.register(ORDER_REPOSITORY_V1, |_| {
        Ok(Component::from_capability::<dyn OrderRepositoryV1>(Arc::new(
            OrderRepositoryV1Impl::new(latency),
        )))
    })?;
    container.register(ORDER_SERVICE_V1, |c| {
        let repository = c.get::<dyn OrderRepositoryV1>(ORDER_REPOSITORY_V1)?;
        Ok(Component::from_capability::<dyn OrderServiceV1>(Arc::new(
            OrderServiceV1Impl::new(repository),
        )))
    })?;
    container.register(ORDER_CONTROLLER_V1, |c| {
        let service = c.get::<dyn OrderServiceV1>(ORDER_SERVICE_V1)?;
        Ok(Component::from_capability::<dyn OrderControllerV1>(Arc::new(
            OrderControllerV1Impl::new(service),
        )))
    })
}

pub fn register_v2(container: &mut Container, latency: Duration) -> Result<(), ContainerError> {
    container.register(ORDER_REPOSITORY_V2, |_| {
        Ok(Component::from_extensible(Arc::new(OrderRepositoryV2::new(latency))))
    })?;
    container.register(ORDER_SERVICE_V2, |c| {
        let repository = c.get::<OrderRepositoryV2>(ORDER_REPOSITORY_V2)?;
        Ok(Component::from_extensible(Arc::new(OrderServiceV2::new(repository))))
    })?;
    container.register(ORDER_CONTROLLER_V2, |c| {
        let service = c.get::<OrderServiceV2>(ORDER_SERVICE_V2)?;
        Ok(Component::from_extensible(Arc::new(OrderControllerV2::new(service))))
    })
}

pub fn register_infra(container: &mut Container) -> Result<(), ContainerError> {
    container.register(CACHE, |_| Ok(Component::sealed(Arc::new(Cache::new()))))
}

/// Build a container whose auto-proxy hook follows `config`.
pub fn build_container(
    config: &ResolvedConfig,
    log_trace: Arc<dyn LogTrace>,
    family: Family,
    latency: Duration,
) -> Result<Container, ContainerError> {
    let hook = config.auto_proxy_hook(config.advisors(log_trace));
    info!(
        selection = %hook.selection(),
        base_scope = %config.base_scope,
        patterns = %config.patterns,
        "Building container"
    );

    let mut container = Container::new().with_post_processor(Arc::new(hook));
    register_infra(&mut container)?;
    if family.includes_v1() {
        register_v1(&mut container, latency)?;
    }
    if family.includes_v2() {
        register_v2(&mut container, latency)?;
    }
    Ok(container)
}
