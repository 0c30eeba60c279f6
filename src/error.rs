// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the weave interception engine.
//!
//! This module provides strongly-typed errors for the construction-time side
//! of the engine, using `thiserror` for ergonomic error definitions and
//! `anyhow` for error propagation. Call-time errors raised by targets are
//! never wrapped: they reach the caller with their original type.

use thiserror::Error;

/// Errors produced while parsing method-name patterns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern must not be empty")]
    Empty,

    #[error("Wildcard allowed only at the start or end of a pattern: {0}")]
    MisplacedWildcard(String),
}

/// Errors raised while building a proxy.
///
/// All of these surface when the proxy is constructed, never when a
/// proxied method is called.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Type cannot be proxied (no capability set and no extension point): {0}")]
    Unproxyable(String),

    #[error("Concrete proxy strategy unavailable for {0}: type has no extension point")]
    StrategyUnavailable(String),

    #[error("No construction path for concrete proxy of {target}: {reason}")]
    NoConstructionPath { target: String, reason: String },

    #[error("Extension point of {0} already carries an interceptor chain")]
    AlreadyExtended(String),
}

impl ProxyError {
    /// Create a construction-path error for the given type.
    pub fn no_construction_path(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoConstructionPath {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid pattern in {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: PatternError,
    },

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Errors reported by the component container.
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Component not found: {0}")]
    NotFound(String),

    #[error("Component already registered: {0}")]
    Duplicate(String),

    #[error("Component {name} does not expose {requested}")]
    WrongType { name: String, requested: &'static str },

    #[error("Post-processing of {name} failed: {source}")]
    PostProcess {
        name: String,
        #[source]
        source: ProxyError,
    },
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
