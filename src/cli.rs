//! CLI definitions for AutoScroll.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cmd_simulate::ScriptStep;

/// AutoScroll CLI.
#[derive(Parser)]
#[command(name = "autoscroll")]
#[command(about = "Frame-paced automatic page scrolling")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Settings file path (default: ~/.autoscroll/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scroll a simulated page driven by scripted shortcuts (default)
    Simulate {
        /// Viewport extent
        #[arg(long, default_value_t = 800.0)]
        viewport: f64,

        /// Initial content extent
        #[arg(long, default_value_t = 6000.0)]
        content: f64,

        /// Load another batch of content whenever the bottom is reached
        #[arg(long)]
        feed: bool,

        /// Extent of each loaded batch
        #[arg(long, default_value_t = 2000.0)]
        batch: f64,

        /// Total run time in seconds
        #[arg(long, default_value_t = 10.0)]
        duration: f64,

        /// Shortcut to fire, as SECONDS=ACTION (e.g. 2.5=speed_up); repeatable
        #[arg(long = "at", value_name = "SECONDS=ACTION")]
        script: Vec<ScriptStep>,
    },

    /// Print the effective configuration and its validation report
    Config {
        /// Output format (toml, json)
        #[arg(long, default_value = "toml")]
        format: String,
    },

    /// Persisted user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum SettingsAction {
    /// Show the stored settings
    Show,

    /// Change stored settings
    Set {
        /// Speed of a newly created controller
        #[arg(long)]
        default_speed: Option<f64>,

        /// Show the on-page control panel
        #[arg(long)]
        overlay: Option<bool>,
    },

    /// Restore the built-in settings
    Reset,
}
