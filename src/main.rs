//! AutoScroll - frame-paced automatic page scrolling.
//!
//! Main entry point for the AutoScroll CLI.

mod cli;
mod cmd_config;
mod cmd_settings;
mod cmd_simulate;

use std::path::Path;

use clap::Parser;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoscroll_config::{
    Config, ConfigError, ConfigLoader, ConfigValidator, SettingsStore, ValidationResult,
};

use cli::{Cli, Commands};
use cmd_config::handle_config_command;
use cmd_settings::handle_settings_command;
use cmd_simulate::{run_simulation, SimulateOptions};

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.autoscroll/logs/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = ConfigLoader::home_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("autoscroll")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the whole program.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the config file and overlay the persisted settings on it.
fn load_config(path: &Path, settings: &SettingsStore) -> Result<Config, ConfigError> {
    let mut config = ConfigLoader::load_or_default(path)?;
    settings.load()?.apply_to(&mut config);
    Ok(config)
}

fn report_validation(result: &ValidationResult) {
    for warning in &result.warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
}

fn invalid_config(result: &ValidationResult) -> ConfigError {
    let details = result
        .errors
        .iter()
        .map(|error| format!("{}: {}", error.path, error.message))
        .collect::<Vec<_>>()
        .join("; ");
    ConfigError::InvalidValue {
        field: "config".to_string(),
        message: details,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    let store = cli
        .settings
        .map(SettingsStore::new)
        .unwrap_or_else(SettingsStore::default_location);

    match cli.command {
        Some(Commands::Settings { action }) => handle_settings_command(&store, action),
        Some(Commands::Config { format }) => {
            let config = load_config(&cli.config, &store)?;
            handle_config_command(&config, &format)
        }
        command => {
            let config = load_config(&cli.config, &store)?;
            let validation = ConfigValidator::validate(&config);
            report_validation(&validation);
            if !validation.is_valid() {
                return Err(invalid_config(&validation).into());
            }

            let options = match command {
                Some(Commands::Simulate {
                    viewport,
                    content,
                    feed,
                    batch,
                    duration,
                    script,
                }) => SimulateOptions {
                    viewport,
                    content,
                    feed,
                    batch,
                    duration,
                    script,
                },
                _ => SimulateOptions::default(),
            };
            run_simulation(config, options).await
        }
    }
}
