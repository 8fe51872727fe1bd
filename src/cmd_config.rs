//! Config subcommand handler.

use autoscroll_config::{Config, ConfigValidator};

/// Print the effective configuration followed by its validation report.
pub(crate) fn handle_config_command(
    config: &Config,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(config)?),
        _ => print!("{}", toml::to_string_pretty(config)?),
    }

    let result = ConfigValidator::validate(config);
    println!();
    for error in &result.errors {
        println!("error   {}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("warning {}: {}", warning.path, warning.message);
    }
    if result.is_valid() && result.warnings.is_empty() {
        println!("Configuration is valid.");
    }
    Ok(())
}
