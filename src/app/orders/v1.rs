// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Order family used through capability traits.

use std::sync::Arc;
use std::time::Duration;

use super::{store, OrderError};
use crate::aop::{AdvisorChain, Capability, Target};

pub trait OrderRepositoryV1: Target + Send + Sync {
    fn save(&self, item_id: &str) -> Result<(), OrderError>;
}

pub trait OrderServiceV1: Target + Send + Sync {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError>;
}

pub trait OrderControllerV1: Target + Send + Sync {
    fn request(&self, item_id: &str) -> Result<String, OrderError>;

    fn no_log(&self) -> String;
}

pub struct OrderRepositoryV1Impl {
    latency: Duration,
}

impl OrderRepositoryV1Impl {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl OrderRepositoryV1 for OrderRepositoryV1Impl {
    fn save(&self, item_id: &str) -> Result<(), OrderError> {
        store(item_id, self.latency)
    }
}

pub struct OrderServiceV1Impl {
    repository: Arc<dyn OrderRepositoryV1>,
}

impl OrderServiceV1Impl {
    pub fn new(repository: Arc<dyn OrderRepositoryV1>) -> Self {
        Self { repository }
    }
}

impl OrderServiceV1 for OrderServiceV1Impl {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.repository.save(item_id)
    }
}

pub struct OrderControllerV1Impl {
    service: Arc<dyn OrderServiceV1>,
}

impl OrderControllerV1Impl {
    pub fn new(service: Arc<dyn OrderServiceV1>) -> Self {
        Self { service }
    }
}

impl OrderControllerV1 for OrderControllerV1Impl {
    fn request(&self, item_id: &str) -> Result<String, OrderError> {
        self.service.order_item(item_id)?;
        Ok("ok".to_string())
    }

    fn no_log(&self) -> String {
        "ok".to_string()
    }
}

pub struct OrderRepositoryV1Proxy {
    target: Arc<dyn OrderRepositoryV1>,
    chain: AdvisorChain,
}

impl OrderRepositoryV1 for OrderRepositoryV1Proxy {
    fn save(&self, item_id: &str) -> Result<(), OrderError> {
        self.chain
            .invoke("save", &[&item_id], || self.target.save(item_id))
    }
}

impl Capability for dyn OrderRepositoryV1 {
    const METHODS: &'static [&'static str] = &["save"];

    fn proxy(target: Arc<Self>, chain: AdvisorChain) -> Arc<Self> {
        Arc::new(OrderRepositoryV1Proxy { target, chain })
    }
}

pub struct OrderServiceV1Proxy {
    target: Arc<dyn OrderServiceV1>,
    chain: AdvisorChain,
}

impl OrderServiceV1 for OrderServiceV1Proxy {
    fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.chain
            .invoke("order_item", &[&item_id], || self.target.order_item(item_id))
    }
}

impl Capability for dyn OrderServiceV1 {
    const METHODS: &'static [&'static str] = &["order_item"];

    fn proxy(target: Arc<Self>, chain: AdvisorChain) -> Arc<Self> {
        Arc::new(OrderServiceV1Proxy { target, chain })
    }
}

pub struct OrderControllerV1Proxy {
    target: Arc<dyn OrderControllerV1>,
    chain: AdvisorChain,
}

impl OrderControllerV1 for OrderControllerV1Proxy {
    fn request(&self, item_id: &str) -> Result<String, OrderError> {
        self.chain
            .invoke("request", &[&item_id], || self.target.request(item_id))
    }

    fn no_log(&self) -> String {
        self.chain
            .invoke_infallible("no_log", &[], || self.target.no_log())
    }
}

impl Capability for dyn OrderControllerV1 {
    const METHODS: &'static [&'static str] = &["request", "no_log"];

    fn proxy(target: Arc<Self>, chain: AdvisorChain) -> Arc<Self> {
        Arc::new(OrderControllerV1Proxy { target, chain })
    }
}
