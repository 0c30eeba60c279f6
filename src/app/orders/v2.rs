// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Order family used through concrete types only.
//!
//! Each type carries an [`Extension`] so it can be proxied by another value
//! of the same type.

use std::sync::Arc;
use std::time::Duration;

use super::{store, OrderError};
use crate::aop::{Extensible, Extension};
use crate::error::ProxyError;

pub struct OrderRepositoryV2 {
    latency: Duration,
    extension: Extension<Self>,
}

impl OrderRepositoryV2 {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            extension: Extension::new(),
        }
    }

    pub fn save(&self, item_id: &str) -> Result<(), OrderError> {
        self.extension
            .call(self, "save", &[&item_id], |repository| store(item_id, repository.latency))
    }
}

impl Extensible for OrderRepositoryV2 {
    const METHODS: &'static [&'static str] = &["save"];

    fn extension(&self) -> &Extension<Self> {
        &self.extension
    }

    fn construct(target: &Self) -> Result<Self, ProxyError> {
        Ok(Self::new(target.latency))
    }
}

pub struct OrderServiceV2 {
    repository: Arc<OrderRepositoryV2>,
    extension: Extension<Self>,
}

impl OrderServiceV2 {
    pub fn new(repository: Arc<OrderRepositoryV2>) -> Self {
        Self {
            repository,
            extension: Extension::new(),
        }
    }

    pub fn order_item(&self, item_id: &str) -> Result<(), OrderError> {
        self.extension
            .call(self, "order_item", &[&item_id], |service| service.repository.save(item_id))
    }
}

impl Extensible for OrderServiceV2 {
    const METHODS: &'static [&'static str] = &["order_item"];

    fn extension(&self) -> &Extension<Self> {
        &self.extension
    }

    /// The stand-in reuses the target's repository as its constructor
    /// argument.
    fn construct(target: &Self) -> Result<Self, ProxyError> {
        Ok(Self::new(Arc::clone(&target.repository)))
    }
}

pub struct OrderControllerV2 {
    service: Arc<OrderServiceV2>,
    extension: Extension<Self>,
}

impl OrderControllerV2 {
    pub fn new(service: Arc<OrderServiceV2>) -> Self {
        Self {
            service,
            extension: Extension::new(),
        }
    }

    pub fn request(&self, item_id: &str) -> Result<String, OrderError> {
        self.extension.call(self, "request", &[&item_id], |controller| -> Result<String, OrderError> {
            controller.service.order_item(item_id)?;
            Ok("ok".to_string())
        })
    }

    pub fn no_log(&self) -> String {
        self.extension
            .call_infallible(self, "no_log", &[], |_| "ok".to_string())
    }
}

impl Extensible for OrderControllerV2 {
    const METHODS: &'static [&'static str] = &["request", "no_log"];

    fn extension(&self) -> &Extension<Self> {
        &self.extension
    }

    fn construct(target: &Self) -> Result<Self, ProxyError> {
        Ok(Self::new(Arc::clone(&target.service)))
    }
}
