// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Calls made by `weave demo`.

use super::orders::v1::OrderControllerV1;
use super::orders::v2::OrderControllerV2;
use super::orders::OrderError;
use super::wiring::{Family, ORDER_CONTROLLER_V1, ORDER_CONTROLLER_V2};
use crate::container::Container;
use crate::error::ContainerError;

/// One controller call and its result.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoCall {
    pub component: &'static str,
    pub method: &'static str,
    pub result: Result<String, OrderError>,
}

/// Call `request(item_id)` and `no_log()` on each registered controller.
pub fn run_demo(container: &Container, family: Family, item_id: &str) -> Result<Vec<DemoCall>, ContainerError> {
    let mut calls = Vec::new();

    if family.includes_v1() {
        let controller = container.get::<dyn OrderControllerV1>(ORDER_CONTROLLER_V1)?;
        calls.push(DemoCall {
            component: ORDER_CONTROLLER_V1,
            method: "request",
            result: controller.request(item_id),
        });
        calls.push(DemoCall {
            component: ORDER_CONTROLLER_V1,
            method: "no_log",
            result: Ok(controller.no_log()),
        });
    }

    if family.includes_v2() {
        let controller = container.get::<OrderControllerV2>(ORDER_CONTROLLER_V2)?;
        calls.push(DemoCall {
            component: ORDER_CONTROLLER_V2,
            method: "request",
            result: controller.request(item_id),
        });
        calls.push(DemoCall {
            component: ORDER_CONTROLLER_V2,
            method: "no_log",
            result: Ok(controller.no_log()),
        });
    }

    Ok(calls)
}
