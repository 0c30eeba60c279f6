// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Config files use camelCase keys and may be JSON or YAML.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::advices::{LogTraceAdvice, TimeAdvice};
use crate::aop::{Advisor, AutoProxyHook, Pointcut, ScopeFilter, Selection};
use crate::pattern::PatternSet;
use crate::trace::{LogTrace, ThreadLocalLogTrace, DEFAULT_INDENT};

/// Method patterns traced when nothing is configured.
pub const DEFAULT_PATTERNS: &[&str] = &["request*", "order*", "save*"];

/// Base scope used when nothing is configured.
pub const DEFAULT_BASE_SCOPE: &str = "weave::app::orders";

/// Interception settings as written in a config file.
///
/// Every field is optional so that files can be layered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Method-name patterns the log-trace advice applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,

    /// Method-name patterns never traced, even when `patterns` match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_patterns: Option<Vec<String>>,

    /// Module subtree whose components are proxied automatically
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_scope: Option<String>,

    /// Module subtrees never proxied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_scopes: Option<Vec<String>>,

    /// Which components the auto-proxy hook selects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,

    /// Always proxy through the concrete type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_concrete_strategy: Option<bool>,

    /// Indent unit for nested trace lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_indent: Option<String>,

    /// Add the timing advice after the log-trace advice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<bool>,
}

/// Merged and validated configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub patterns: PatternSet,
    pub excluded_patterns: PatternSet,
    pub base_scope: ScopeFilter,
    pub exclude_scopes: Vec<ScopeFilter>,
    pub selection: Selection,
    pub force_concrete_strategy: bool,
    pub trace_indent: String,
    pub timing: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            patterns: PatternSet::new(DEFAULT_PATTERNS.iter().copied())
                .unwrap_or_else(|_| PatternSet::any()),
            excluded_patterns: PatternSet::empty(),
            base_scope: ScopeFilter::new(DEFAULT_BASE_SCOPE),
            exclude_scopes: Vec::new(),
            selection: Selection::BaseScope,
            force_concrete_strategy: false,
            trace_indent: DEFAULT_INDENT.to_string(),
            timing: false,
        }
    }
}

impl ResolvedConfig {
    /// Configured patterns minus the excluded ones, on any type.
    pub fn pointcut(&self) -> Pointcut {
        Pointcut::from_patterns(self.patterns.clone()).with_excluded(self.excluded_patterns.clone())
    }

    pub fn log_trace(&self) -> ThreadLocalLogTrace {
        ThreadLocalLogTrace::new().with_indent(self.trace_indent.clone())
    }

    /// The log-trace advisor, followed by the time advisor when enabled.
    pub fn advisors(&self, log_trace: Arc<dyn LogTrace>) -> Vec<Arc<Advisor>> {
        let mut advisors = vec![Advisor::new("log-trace", self.pointcut(), LogTraceAdvice::new(log_trace)).shared()];
        if self.timing {
            advisors.push(Advisor::new("time", self.pointcut(), TimeAdvice::new()).shared());
        }
        advisors
    }

    pub fn auto_proxy_hook(&self, advisors: Vec<Arc<Advisor>>) -> AutoProxyHook {
        let hook = match self.selection {
            Selection::BaseScope => AutoProxyHook::for_scope(self.base_scope.clone(), advisors),
            Selection::Advisors => AutoProxyHook::advisor_driven(advisors),
        };
        self.exclude_scopes
            .iter()
            .cloned()
            .fold(hook, |hook, scope| hook.excluding(scope))
            .with_force_concrete_strategy(self.force_concrete_strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_config_default() {
        let config = WorkspaceConfig::default();
        assert!(config.patterns.is_none());
        assert!(config.selection.is_none());
    }

    #[test]
    fn test_workspace_config_json_keys() {
        let config = WorkspaceConfig {
            excluded_patterns: Some(vec!["no_log".to_string()]),
            force_concrete_strategy: Some(true),
            selection: Some(Selection::Advisors),
            ..Default::default()
        };

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"excludedPatterns\""));
        assert!(json.contains("\"forceConcreteStrategy\": true"));
        assert!(json.contains("\"selection\": \"advisors\""));
        assert!(!json.contains("baseScope"));
    }

    #[test]
    fn test_workspace_config_yaml() {
        let yaml = "patterns:\n  - save*\nbaseScope: app.orders\ntiming: true\n";
        let parsed: WorkspaceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.patterns, Some(vec!["save*".to_string()]));
        assert_eq!(parsed.base_scope.as_deref(), Some("app.orders"));
        assert_eq!(parsed.timing, Some(true));
    }

    #[test]
    fn test_resolved_config_default() {
        let config = ResolvedConfig::default();
        assert!(config.patterns.matches("request"));
        assert!(config.patterns.matches("order_item"));
        assert!(config.patterns.matches("save"));
        assert!(!config.patterns.matches("no_log"));
        assert_eq!(config.base_scope.base(), "weave::app::orders");
        assert_eq!(config.trace_indent, "|   ");
    }

    #[test]
    fn test_advisors_follow_timing_flag() {
        let mut config = ResolvedConfig::default();
        let log_trace: Arc<dyn LogTrace> = Arc::new(config.log_trace());
        let names = |advisors: Vec<Arc<Advisor>>| -> Vec<String> {
            advisors.iter().map(|a| a.name().to_string()).collect()
        };

        assert_eq!(names(config.advisors(Arc::clone(&log_trace))), vec!["log-trace"]);
        config.timing = true;
        assert_eq!(names(config.advisors(log_trace)), vec!["log-trace", "time"]);
    }

    #[test]
    fn test_pointcut_applies_exclusions() {
        let config = ResolvedConfig {
            patterns: PatternSet::any(),
            excluded_patterns: PatternSet::new(["no_log"]).unwrap(),
            ..Default::default()
        };
        assert!(config.pointcut().matches_method("request"));
        assert!(!config.pointcut().matches_method("no_log"));
    }

    #[test]
    fn test_auto_proxy_hook_from_config() {
        let config = ResolvedConfig {
            exclude_scopes: vec![ScopeFilter::new("weave::app::orders::v2")],
            force_concrete_strategy: true,
            ..Default::default()
        };
        let hook = config.auto_proxy_hook(Vec::new());
        assert_eq!(hook.selection(), Selection::BaseScope);
        assert_eq!(hook.base_scope().map(ScopeFilter::base), Some("weave::app::orders"));
        assert_eq!(hook.excluded_scopes().len(), 1);

        let driven = ResolvedConfig {
            selection: Selection::Advisors,
            ..Default::default()
        };
        assert!(driven.auto_proxy_hook(Vec::new()).base_scope().is_none());
    }

    #[test]
    fn test_resolved_config_serializes_patterns_as_strings() {
        let json = serde_json::to_value(ResolvedConfig::default()).unwrap();
        assert_eq!(json["patterns"][0], "request*");
        assert_eq!(json["baseScope"], "weave::app::orders");
        assert_eq!(json["selection"], "baseScope");
    }
}
