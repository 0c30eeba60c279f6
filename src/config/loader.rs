// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::WorkspaceConfig;

/// Workspace config file names, first match wins.
pub const CONFIG_FILES: &[&str] = &[
    ".weave.json",
    ".weave/config.json",
    "weave.config.json",
    ".weave.yaml",
];

/// Local override file, meant to stay out of version control.
pub const LOCAL_CONFIG_FILE: &str = ".weave.local.json";

pub const GLOBAL_CONFIG_DIR: &str = ".weave";

pub const GLOBAL_CONFIG_FILE: &str = "config.json";

pub fn get_global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR))
}

pub fn get_global_config_path() -> Option<PathBuf> {
    get_global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Load `~/.weave/config.json` if present.
pub fn load_global_config() -> Result<Option<WorkspaceConfig>, ConfigError> {
    match get_global_config_path() {
        Some(path) if path.exists() => load_config_file(&path).map(Some),
        _ => Ok(None),
    }
}

/// Load the first of [`CONFIG_FILES`] found in `workspace_root`.
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<WorkspaceConfig>, ConfigError> {
    match find_config_file(workspace_root) {
        Some(path) => load_config_file(&path).map(Some),
        None => Ok(None),
    }
}

pub fn load_local_config(workspace_root: &Path) -> Result<Option<WorkspaceConfig>, ConfigError> {
    let path = workspace_root.join(LOCAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// The workspace config file that would be loaded from `dir`.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Load a JSON or YAML config file, chosen by extension.
pub fn load_config_file(path: &Path) -> Result<WorkspaceConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        _ => serde_json::from_str(&content).map_err(ConfigError::from),
    }
}

pub fn save_workspace_config(
    workspace_root: &Path,
    config: &WorkspaceConfig,
    filename: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    let path = workspace_root.join(filename.unwrap_or(CONFIG_FILES[0]));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = if path.extension().map_or(false, |e| e == "yaml" || e == "yml") {
        serde_yaml::to_string(config)?
    } else {
        serde_json::to_string_pretty(config)?
    };
    std::fs::write(&path, content)?;

    Ok(path)
}

/// Write `config`, or the example configuration, to `.weave.json`.
pub fn init_config(
    workspace_root: &Path,
    config: Option<WorkspaceConfig>,
) -> Result<PathBuf, ConfigError> {
    let config = config.unwrap_or_else(get_example_config);
    save_workspace_config(workspace_root, &config, None)
}

/// Walk up from `start` to the first directory holding a workspace config.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| find_config_file(dir).is_some())
        .map(Path::to_path_buf)
}

/// The configuration written by `weave config init`.
pub fn get_example_config() -> WorkspaceConfig {
    WorkspaceConfig {
        patterns: Some(vec![
            "request*".to_string(),
            "order*".to_string(),
            "save*".to_string(),
        ]),
        excluded_patterns: Some(vec!["no_log".to_string()]),
        base_scope: Some("weave::app::orders".to_string()),
        exclude_scopes: Some(vec!["weave::app::infra".to_string()]),
        timing: Some(false),
        ..Default::default()
    }
}
