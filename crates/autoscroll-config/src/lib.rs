//! # AutoScroll Config
//!
//! Configuration management for AutoScroll: the TOML schema with its
//! defaults, a loader with environment variable substitution, a validator,
//! and the persisted user settings edited by the options page.

mod error;
mod loader;
mod schema;
mod settings;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use settings::{Settings, SettingsStore};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
