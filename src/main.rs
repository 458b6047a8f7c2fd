use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

mod app;
mod cli;
mod core;
mod sources;
mod ui;

use crate::core::settings::{FetchMode, Settings};

#[derive(Parser)]
#[command(name = "refresh-label")]
#[command(author, version, about = "GTK window that keeps a label in sync with a polled data source")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the window and start refreshing
    Run {
        /// Refresh interval in milliseconds
        #[arg(long)]
        interval: Option<u64>,

        /// Fetch on a background worker instead of the interface thread
        #[arg(long)]
        background: bool,
    },

    /// Fetch one value from the data source and print it
    Fetch {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Installed before the config is read so config loading is logged too.
/// The returned handle raises the level once `debug = true` is known.
fn init_logging() -> FilterHandle {
    let (filter, handle) = reload::Layer::new(env_filter(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    handle
}

fn apply_debug(handle: &FilterHandle, debug: bool) {
    if !debug {
        return;
    }
    if let Err(e) = handle.reload(env_filter(true)) {
        tracing::warn!(error = %e, "Failed to raise log level");
    }
}

fn load_settings(path: Option<&Path>, logging: &FilterHandle) -> anyhow::Result<Settings> {
    let settings = Settings::load(path)?;
    apply_debug(logging, settings.debug);
    Ok(settings)
}

/// Fetches still running on the blocking pool are abandoned, not joined,
/// so closing the window ends the process right away.
fn shutdown_runtime(runtime: tokio::runtime::Runtime) {
    runtime.shutdown_background();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let logging = init_logging();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run {
            interval,
            background,
        } => {
            let mut settings = load_settings(config, &logging)?;

            if let Some(interval_ms) = interval {
                settings.refresh.interval_ms = interval_ms;
            }
            if background {
                settings.refresh.mode = FetchMode::Background;
            }
            settings.validate()?;

            app::run(settings, runtime.handle().clone())
        }
        Commands::Fetch { json } => {
            let settings = load_settings(config, &logging)?;
            settings.validate()?;
            runtime.block_on(cli::fetch::run(&settings, json))
        }
        Commands::Config { path } => {
            let settings = load_settings(config, &logging)?;
            settings.validate()?;
            cli::config::run(&settings, config, path)
        }
        Commands::Completions { .. } => Ok(()),
    };

    shutdown_runtime(runtime);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_shutdown_does_not_wait_for_blocking_fetch() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.spawn_blocking(|| std::thread::sleep(Duration::from_secs(5)));

        let started = Instant::now();
        shutdown_runtime(runtime);

        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::parse_from([
            "refresh-label",
            "run",
            "--interval",
            "500",
            "--background",
            "--config",
            "/tmp/custom.toml",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/custom.toml")));
        match cli.command {
            Commands::Run {
                interval,
                background,
            } => {
                assert_eq!(interval, Some(500));
                assert!(background);
            }
            _ => panic!("expected run subcommand"),
        }
    }
}
