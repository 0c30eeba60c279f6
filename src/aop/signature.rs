// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Type and method identity used by pointcuts and trace messages.

use std::borrow::Cow;
use std::fmt;

/// The declared type of a proxy target.
///
/// Holds the full Rust path of the type; the module path plays the role
/// of a package when scope filters are evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    path: Cow<'static, str>,
}

impl TargetType {
    /// The type of `T`, with generic parameters stripped.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let name = std::any::type_name::<T>();
        let name = name.split('<').next().unwrap_or(name);
        Self {
            path: Cow::Borrowed(name.strip_prefix("dyn ").unwrap_or(name)),
        }
    }

    /// A type identified by an explicit path such as `app::orders::OrderService`.
    pub fn named(path: impl Into<String>) -> Self {
        Self {
            path: Cow::Owned(path.into().replace('.', "::")),
        }
    }

    /// Full path, e.g. `weave::app::orders::v1::OrderServiceV1Impl`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment, e.g. `OrderServiceV1Impl`.
    pub fn simple_name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    /// Everything before the last segment, empty for a bare name.
    pub fn module_path(&self) -> &str {
        self.path
            .rsplit_once("::")
            .map(|(module, _)| module)
            .unwrap_or("")
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Identity of one method on one target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    target: TargetType,
    name: &'static str,
}

impl MethodSignature {
    pub fn new(target: TargetType, name: &'static str) -> Self {
        Self { target, name }
    }

    pub fn target(&self) -> &TargetType {
        &self.target
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `Type.method()`, the form used in trace messages.
    pub fn short_string(&self) -> String {
        format!("{}.{}()", self.target.simple_name(), self.name)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.target, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;
    struct Generic<T>(T);
    trait Capability {}

    #[test]
    fn test_target_type_of() {
        let ty = TargetType::of::<Sample>();
        assert_eq!(ty.simple_name(), "Sample");
        assert!(ty.module_path().ends_with("aop::signature::tests"));
    }

    #[test]
    fn test_target_type_strips_generics() {
        let ty = TargetType::of::<Generic<String>>();
        assert_eq!(ty.simple_name(), "Generic");
    }

    #[test]
    fn test_target_type_of_trait_object() {
        let ty = TargetType::of::<dyn Capability>();
        assert_eq!(ty.simple_name(), "Capability");
        assert!(!ty.path().starts_with("dyn"));
    }

    #[test]
    fn test_target_type_named_normalises_dots() {
        let ty = TargetType::named("app.orders.OrderService");
        assert_eq!(ty.path(), "app::orders::OrderService");
        assert_eq!(ty.module_path(), "app::orders");
        assert_eq!(ty.simple_name(), "OrderService");
    }

    #[test]
    fn test_bare_name_has_empty_module() {
        let ty = TargetType::named("Bare");
        assert_eq!(ty.module_path(), "");
        assert_eq!(ty.simple_name(), "Bare");
    }

    #[test]
    fn test_signature_short_string() {
        let sig = MethodSignature::new(TargetType::named("app::orders::OrderService"), "save");
        assert_eq!(sig.short_string(), "OrderService.save()");
        assert_eq!(sig.to_string(), "app::orders::OrderService::save");
    }
}
