// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interception settings.
//!
//! Sources, merged with precedence CLI > local > workspace > global >
//! defaults:
//! - Global config: `~/.weave/config.json`
//! - Workspace config: `.weave.json`, `.weave/config.json`,
//!   `weave.config.json` or `.weave.yaml`
//! - Local config: `.weave.local.json`
//! - CLI options

mod loader;
mod merger;
mod types;

pub use loader::{
    find_config_file, find_workspace_root, get_example_config, get_global_config_dir,
    get_global_config_path, init_config, load_config_file, load_global_config, load_local_config,
    load_workspace_config, save_workspace_config, CONFIG_FILES, GLOBAL_CONFIG_DIR,
    GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE,
};

pub use merger::{default_config, merge_config, CliOptions};

pub use types::{ResolvedConfig, WorkspaceConfig, DEFAULT_BASE_SCOPE, DEFAULT_PATTERNS};

use crate::error::ConfigError;
use std::path::Path;

/// Load and merge every configuration source for a workspace.
pub fn load_config(
    workspace_root: &Path,
    cli_options: CliOptions,
) -> Result<ResolvedConfig, ConfigError> {
    let global = load_global_config()?;
    let workspace = load_workspace_config(workspace_root)?;
    let local = load_local_config(workspace_root)?;

    merge_config(global, workspace, local, cli_options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_with_workspace_and_local() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".weave.json"),
            r#"{"patterns": ["save*"], "baseScope": "app.orders"}"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join(LOCAL_CONFIG_FILE),
            r#"{"baseScope": "app.orders.v1"}"#,
        )
        .unwrap();

        let config = load_config(temp.path(), CliOptions::default()).unwrap();
        assert!(config.patterns.matches("save"));
        assert_eq!(config.base_scope.base(), "app::orders::v1");
    }

    #[test]
    fn test_load_config_cli_override() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".weave.json"), r#"{"forceConcreteStrategy": false}"#)
            .unwrap();

        let cli = CliOptions {
            force_concrete: Some(true),
            ..Default::default()
        };

        let config = load_config(temp.path(), cli).unwrap();
        assert!(config.force_concrete_strategy);
    }

    #[test]
    fn test_load_config_rejects_bad_pattern() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".weave.json"), r#"{"patterns": ["**"]}"#).unwrap();

        assert!(matches!(
            load_config(temp.path(), CliOptions::default()),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }
}
