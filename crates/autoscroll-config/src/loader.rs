//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        debug!("Loading config from {}", path.display());
        Self::load_str(&content)
    }

    /// Load configuration from a file, falling back to defaults when it is absent.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Config::default())
            }
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
        });

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.autoscroll`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Directory holding AutoScroll's config, settings and logs.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".autoscroll"))
            .unwrap_or_else(|| PathBuf::from(".autoscroll"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ShortcutAction;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.scroll.default_speed, 600.0);
        assert_eq!(config.bus.query_timeout_ms, 250);
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/.autoscroll");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_home_dir_name() {
        assert!(ConfigLoader::home_dir().ends_with(".autoscroll"));
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [scroll]
            min_speed = 100
            max_speed = 2000
            default_speed = 400
            step = 100
            threshold = 2
            overlay_enabled = false

            [frames]
            rate_hz = 30

            [bus]
            query_timeout_ms = 50

            [shortcuts.bindings]
            "Alt+J" = "speed_down"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.scroll.min_speed, 100.0);
        assert_eq!(config.scroll.max_speed, 2000.0);
        assert_eq!(config.scroll.default_speed, 400.0);
        assert_eq!(config.scroll.step, 100.0);
        assert_eq!(config.scroll.threshold, 2.0);
        assert!(!config.scroll.overlay_enabled);
        assert_eq!(config.frames.rate_hz, 30);
        assert_eq!(config.bus.query_timeout_ms, 50);
        assert_eq!(config.bus.relay_timeout_ms, 1000);
        assert_eq!(
            config.shortcuts.bindings.get("Alt+J"),
            Some(&ShortcutAction::SpeedDown)
        );
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: test-only, unique variable name.
        unsafe { std::env::set_var("AUTOSCROLL_TEST_SPEED", "1200") };
        let config = ConfigLoader::load_str(
            r#"
                [scroll]
                default_speed = ${AUTOSCROLL_TEST_SPEED}
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.default_speed, 1200.0);
    }

    #[test]
    fn test_missing_env_var() {
        let result = ConfigLoader::load_str(
            r#"
                [scroll]
                default_speed = ${AUTOSCROLL_SURELY_UNSET_VAR}
            "#,
        );
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(name)) if name == "AUTOSCROLL_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = ConfigLoader::load_str("[scroll\nmin_speed = ");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scroll]\nstep = 75").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.scroll.step, 75.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/autoscroll.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/autoscroll.toml")).unwrap();
        assert_eq!(config.scroll.default_speed, 600.0);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = ConfigLoader::load_str(include_str!("../../../config/default.toml")).unwrap();
        let defaults = Config::default();
        assert_eq!(config.scroll.default_speed, defaults.scroll.default_speed);
        assert_eq!(config.scroll.overlay_step, defaults.scroll.overlay_step);
        assert_eq!(config.frames.rate_hz, defaults.frames.rate_hz);
        assert_eq!(config.bus.relay_timeout_ms, defaults.bus.relay_timeout_ms);
        assert_eq!(config.shortcuts.bindings, defaults.shortcuts.bindings);
    }
}
