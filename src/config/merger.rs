// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging and validation.

use crate::aop::{ScopeFilter, Selection};
use crate::error::ConfigError;
use crate::pattern::PatternSet;

use super::types::{ResolvedConfig, WorkspaceConfig};

/// Command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub patterns: Option<Vec<String>>,
    pub base_scope: Option<String>,
    pub selection: Option<Selection>,
    pub force_concrete: Option<bool>,
    pub timing: Option<bool>,
}

pub fn default_config() -> ResolvedConfig {
    ResolvedConfig::default()
}

/// Merge the config layers into one validated configuration.
///
/// Precedence, highest first: CLI, local, workspace, global, defaults.
/// Scalar keys and `patterns` are replaced by higher layers;
/// `excludedPatterns` and `excludeScopes` accumulate.
pub fn merge_config(
    global: Option<WorkspaceConfig>,
    workspace: Option<WorkspaceConfig>,
    local: Option<WorkspaceConfig>,
    cli: CliOptions,
) -> Result<ResolvedConfig, ConfigError> {
    let mut merged = WorkspaceConfig::default();
    for layer in [global, workspace, local].into_iter().flatten() {
        apply_layer(&mut merged, layer);
    }
    apply_cli_options(&mut merged, cli);

    resolve(merged)
}

fn apply_layer(merged: &mut WorkspaceConfig, layer: WorkspaceConfig) {
    if layer.patterns.is_some() {
        merged.patterns = layer.patterns;
    }

    if let Some(excluded) = layer.excluded_patterns {
        append_unique(merged.excluded_patterns.get_or_insert_with(Vec::new), excluded);
    }

    if layer.base_scope.is_some() {
        merged.base_scope = layer.base_scope;
    }

    if let Some(scopes) = layer.exclude_scopes {
        append_unique(merged.exclude_scopes.get_or_insert_with(Vec::new), scopes);
    }

    if layer.selection.is_some() {
        merged.selection = layer.selection;
    }

    if layer.force_concrete_strategy.is_some() {
        merged.force_concrete_strategy = layer.force_concrete_strategy;
    }

    if layer.trace_indent.is_some() {
        merged.trace_indent = layer.trace_indent;
    }

    if layer.timing.is_some() {
        merged.timing = layer.timing;
    }
}

fn apply_cli_options(merged: &mut WorkspaceConfig, cli: CliOptions) {
    if let Some(patterns) = cli.patterns.filter(|p| !p.is_empty()) {
        merged.patterns = Some(patterns);
    }

    if cli.base_scope.is_some() {
        merged.base_scope = cli.base_scope;
    }

    if cli.selection.is_some() {
        merged.selection = cli.selection;
    }

    if cli.force_concrete.is_some() {
        merged.force_concrete_strategy = cli.force_concrete;
    }

    if cli.timing.is_some() {
        merged.timing = cli.timing;
    }
}

fn append_unique(into: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !into.contains(&value) {
            into.push(value);
        }
    }
}

fn pattern_set(field: &str, raw: &[String]) -> Result<PatternSet, ConfigError> {
    PatternSet::new(raw).map_err(|source| ConfigError::InvalidPattern {
        field: field.to_string(),
        source,
    })
}

fn scope(field: &str, raw: &str) -> Result<ScopeFilter, ConfigError> {
    if raw.contains('*') || raw.trim().contains(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{:?} is not a module path", raw),
        });
    }
    Ok(ScopeFilter::new(raw))
}

fn resolve(merged: WorkspaceConfig) -> Result<ResolvedConfig, ConfigError> {
    let defaults = default_config();

    let patterns = match &merged.patterns {
        Some(raw) => pattern_set("patterns", raw)?,
        None => defaults.patterns,
    };

    let excluded_patterns = match &merged.excluded_patterns {
        Some(raw) => pattern_set("excludedPatterns", raw)?,
        None => defaults.excluded_patterns,
    };

    let base_scope = match &merged.base_scope {
        Some(raw) => scope("baseScope", raw)?,
        None => defaults.base_scope,
    };

    let exclude_scopes = merged
        .exclude_scopes
        .unwrap_or_default()
        .iter()
        .map(|raw| scope("excludeScopes", raw))
        .collect::<Result<Vec<_>, _>>()?;

    let trace_indent = merged.trace_indent.unwrap_or(defaults.trace_indent);
    if trace_indent.contains(['\n', '\r']) {
        return Err(ConfigError::InvalidValue {
            field: "traceIndent".to_string(),
            message: "must fit on one line".to_string(),
        });
    }

    Ok(ResolvedConfig {
        patterns,
        excluded_patterns,
        base_scope,
        exclude_scopes,
        selection: merged.selection.unwrap_or(defaults.selection),
        force_concrete_strategy: merged
            .force_concrete_strategy
            .unwrap_or(defaults.force_concrete_strategy),
        trace_indent,
        timing: merged.timing.unwrap_or(defaults.timing),
    })
}
