// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Weave main entry point - demo runner, pattern matcher and config commands.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;

use weave::app::orders::DEFAULT_LATENCY;
use weave::app::{build_container, run_demo, Family};
use weave::config::{self, CliOptions};
use weave::pattern::PatternSet;
use weave::telemetry::{init_telemetry, TelemetryConfig, GLOBAL_METRICS};
use weave::trace::LogTrace;

/// Weave version string.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Weave - method interception and proxy composition.
#[derive(Parser)]
#[command(name = "weave")]
#[command(author, version, about = "Method interception and proxy composition", long_about = None)]
struct Cli {
    /// Method-name patterns the advisors match (repeatable)
    #[arg(short, long = "pattern", global = true, env = "WEAVE_PATTERNS", value_delimiter = ',')]
    patterns: Vec<String>,

    /// Module path whose components are proxied
    #[arg(long, global = true, env = "WEAVE_BASE_SCOPE")]
    base_scope: Option<String>,

    /// Always subclass-style proxy concrete components
    #[arg(long, global = true)]
    force_concrete: bool,

    /// Add the timing advice after the log-trace advice
    #[arg(long, global = true)]
    timing: bool,

    /// Show debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Show trace output
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn cli_options(&self) -> CliOptions {
        CliOptions {
            patterns: if self.patterns.is_empty() {
                None
            } else {
                Some(self.patterns.clone())
            },
            base_scope: self.base_scope.clone(),
            selection: None,
            force_concrete: if self.force_concrete { Some(true) } else { None },
            timing: if self.timing { Some(true) } else { None },
        }
    }
}

/// Subcommands for weave.
#[derive(Subcommand)]
enum Commands {
    /// Build the sample container and call every controller
    Demo {
        /// Order families to register
        #[arg(short, long, value_enum, default_value = "all")]
        family: Family,

        /// Item id passed to `request` ("ex" fails)
        #[arg(short, long, default_value = "item-1")]
        item_id: String,

        /// Simulated repository latency
        #[arg(short, long, default_value_t = DEFAULT_LATENCY.as_millis() as u64)]
        latency_ms: u64,
    },

    /// Test method names against the configured patterns
    Match {
        /// Method names to test
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show or create configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Show version information
    Version,
}

/// Config subcommand actions.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show the resolved configuration
    Show,
    /// Write an example workspace configuration file
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = init_telemetry(&TelemetryConfig::for_cli(cli.debug, cli.trace))?;

    let workspace_root = std::env::current_dir()?;
    let root = config::find_workspace_root(&workspace_root).unwrap_or(workspace_root);
    let cli_options = cli.cli_options();

    match cli.command {
        Commands::Demo {
            family,
            item_id,
            latency_ms,
        } => {
            let config = config::load_config(&root, cli_options)?;
            handle_demo(&config, family, &item_id, Duration::from_millis(latency_ms))
        }
        Commands::Match { names } => {
            let config = config::load_config(&root, cli_options)?;
            handle_match(&config.patterns, &config.excluded_patterns, &names);
            Ok(())
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let config = config::load_config(&root, cli_options)?;
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            Some(ConfigAction::Init) => {
                let path = config::init_config(&root, None)?;
                println!("Created config file: {}", path.display());
                Ok(())
            }
        },
        Commands::Version => {
            println!("weave {}", VERSION);
            Ok(())
        }
    }
}

fn handle_demo(
    config: &config::ResolvedConfig,
    family: Family,
    item_id: &str,
    latency: Duration,
) -> anyhow::Result<()> {
    let log_trace: Arc<dyn LogTrace> = Arc::new(config.log_trace());
    let container = build_container(config, log_trace, family, latency)?;

    println!("{}", "Components".bright_blue().bold());
    for name in container.names() {
        if let Some(component) = container.component(name) {
            let kind = match component.strategy() {
                Some(strategy) => format!("proxy ({})", strategy).green(),
                None => "plain".dimmed(),
            };
            println!("  {} {} [{}]", name.bright_white(), component.target_type(), kind);
        }
    }

    println!("\n{}", "Calls".bright_blue().bold());
    for call in run_demo(&container, family, item_id)? {
        match &call.result {
            Ok(value) => println!("  {} {}.{} -> {}", "✓".green(), call.component, call.method, value),
            Err(err) => println!("  {} {}.{} -> {}", "✗".red(), call.component, call.method, err.to_string().red()),
        }
    }

    if config.timing {
        println!("\n{}", GLOBAL_METRICS.snapshot().format_report());
    }

    Ok(())
}

fn handle_match(patterns: &PatternSet, excluded: &PatternSet, names: &[String]) {
    println!("Patterns: {}", patterns.to_string().bright_white());
    if !excluded.is_empty() {
        println!("Excluded: {}", excluded.to_string().dimmed());
    }
    for name in names {
        if excluded.matches(name) {
            println!("  {} {} (excluded)", "-".yellow(), name);
        } else if patterns.matches(name) {
            println!("  {} {}", "✓".green(), name);
        } else {
            println!("  {} {}", "✗".red(), name.dimmed());
        }
    }
}
