// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Applicability filters: which types and which methods an advice covers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::signature::{MethodSignature, TargetType};
use crate::error::PatternError;
use crate::pattern::PatternSet;

/// A module-path subtree, e.g. `weave::app::orders`.
///
/// Accepts types declared directly in the module or anywhere beneath it.
/// `.` is accepted as a separator in place of `::`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ScopeFilter {
    base: String,
}

impl ScopeFilter {
    pub fn new(base: impl AsRef<str>) -> Self {
        let base = base.as_ref().trim().replace('.', "::");
        Self {
            base: base.trim_end_matches(':').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Check whether `target` lives in this subtree.
    pub fn accepts(&self, target: &TargetType) -> bool {
        let module = target.module_path();
        if self.base.is_empty() {
            return true;
        }
        match module.strip_prefix(self.base.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }
}

impl From<String> for ScopeFilter {
    fn from(base: String) -> Self {
        Self::new(base)
    }
}

impl From<&str> for ScopeFilter {
    fn from(base: &str) -> Self {
        Self::new(base)
    }
}

impl From<ScopeFilter> for String {
    fn from(scope: ScopeFilter) -> Self {
        scope.base
    }
}

impl fmt::Display for ScopeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

/// Decides whether an advice applies to a target type and to a method.
///
/// The type filter is consulted once, when a proxy is built; the method
/// filter on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointcut {
    methods: PatternSet,
    excluded_methods: PatternSet,
    scope: Option<ScopeFilter>,
}

impl Pointcut {
    /// Matches every method of every type.
    pub fn always() -> Self {
        Self {
            methods: PatternSet::any(),
            excluded_methods: PatternSet::empty(),
            scope: None,
        }
    }

    /// Matches methods whose name matches any of `patterns`, on any type.
    pub fn name_match<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::from_patterns(PatternSet::new(patterns)?))
    }

    pub fn from_patterns(methods: PatternSet) -> Self {
        Self {
            methods,
            excluded_methods: PatternSet::empty(),
            scope: None,
        }
    }

    /// Every method of every type inside `scope`.
    pub fn within(scope: impl Into<ScopeFilter>) -> Self {
        Self::always().with_scope(scope)
    }

    /// Restrict to types inside `scope`.
    pub fn with_scope(mut self, scope: impl Into<ScopeFilter>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Never match methods whose name matches any of `patterns`.
    pub fn excluding<I, S>(mut self, patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_methods = PatternSet::new(patterns)?;
        Ok(self)
    }

    /// [`excluding`](Self::excluding) with an already parsed set.
    pub fn with_excluded(mut self, excluded: PatternSet) -> Self {
        self.excluded_methods = excluded;
        self
    }

    pub fn methods(&self) -> &PatternSet {
        &self.methods
    }

    pub fn excluded_methods(&self) -> &PatternSet {
        &self.excluded_methods
    }

    pub fn scope(&self) -> Option<&ScopeFilter> {
        self.scope.as_ref()
    }

    /// Type filter. Without a scope every type is accepted.
    pub fn accepts_type(&self, target: &TargetType) -> bool {
        self.scope.as_ref().map_or(true, |scope| scope.accepts(target))
    }

    /// Method filter.
    pub fn matches_method(&self, name: &str) -> bool {
        self.methods.matches(name) && !self.excluded_methods.matches(name)
    }

    /// Both filters.
    pub fn matches(&self, signature: &MethodSignature) -> bool {
        self.accepts_type(signature.target()) && self.matches_method(signature.name())
    }
}

impl Default for Pointcut {
    fn default() -> Self {
        Self::always()
    }
}
