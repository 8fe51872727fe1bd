//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_speeds(config, &mut result);
        Self::validate_detection(config, &mut result);
        Self::validate_frames(config, &mut result);
        Self::validate_bus(config, &mut result);
        Self::validate_shortcuts(config, &mut result);

        result
    }

    fn validate_speeds(config: &Config, result: &mut ValidationResult) {
        let scroll = &config.scroll;

        if !(scroll.min_speed.is_finite() && scroll.min_speed > 0.0) {
            result.add_error(ValidationError::new(
                "scroll.min_speed",
                "min_speed must be a positive number",
            ));
        }

        if !scroll.max_speed.is_finite() || scroll.max_speed < scroll.min_speed {
            result.add_error(ValidationError::new(
                "scroll.max_speed",
                "max_speed must be finite and not below min_speed",
            ));
        }

        if !(scroll.min_speed..=scroll.max_speed).contains(&scroll.default_speed) {
            result.add_error(ValidationError::new(
                "scroll.default_speed",
                format!(
                    "default_speed {} is outside [{}, {}]",
                    scroll.default_speed, scroll.min_speed, scroll.max_speed
                ),
            ));
        }

        if !(scroll.step.is_finite() && scroll.step > 0.0) {
            result.add_error(ValidationError::new("scroll.step", "step must be positive"));
        }

        if !(scroll.overlay_step.is_finite() && scroll.overlay_step > 0.0) {
            result.add_error(ValidationError::new(
                "scroll.overlay_step",
                "overlay_step must be positive",
            ));
        } else if scroll.overlay_step > scroll.step {
            result.add_warning(ValidationWarning::new(
                "scroll.overlay_step",
                "overlay_step is larger than the shortcut step",
            ));
        }
    }

    fn validate_detection(config: &Config, result: &mut ValidationResult) {
        let scroll = &config.scroll;

        if !(scroll.threshold.is_finite() && scroll.threshold >= 0.0) {
            result.add_error(ValidationError::new(
                "scroll.threshold",
                "threshold must be zero or positive",
            ));
        } else if scroll.threshold == 0.0 {
            result.add_warning(ValidationWarning::new(
                "scroll.threshold",
                "a zero threshold may never detect the bottom on hosts with sub-pixel layout",
            ));
        }

        if !(scroll.growth_margin.is_finite() && scroll.growth_margin >= 0.0) {
            result.add_error(ValidationError::new(
                "scroll.growth_margin",
                "growth_margin must be zero or positive",
            ));
        }
    }

    fn validate_frames(config: &Config, result: &mut ValidationResult) {
        if config.frames.rate_hz == 0 {
            result.add_error(ValidationError::new(
                "frames.rate_hz",
                "rate_hz must be greater than 0",
            ));
        }

        if config.frames.rate_hz > 240 {
            result.add_warning(ValidationWarning::new(
                "frames.rate_hz",
                "rate_hz above 240 wastes CPU without smoother scrolling",
            ));
        }
    }

    fn validate_bus(config: &Config, result: &mut ValidationResult) {
        if config.bus.query_timeout_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "bus.query_timeout_ms",
                "a zero query timeout always answers uncached queries with the default state",
            ));
        }

        if config.bus.relay_timeout_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "bus.relay_timeout_ms",
                "a zero relay timeout reports every command as failed",
            ));
        }
    }

    fn validate_shortcuts(config: &Config, result: &mut ValidationResult) {
        for chord in config.shortcuts.bindings.keys() {
            if chord.trim().is_empty() || chord.split('+').any(|part| part.trim().is_empty()) {
                result.add_error(ValidationError::new(
                    "shortcuts.bindings",
                    format!("Malformed key chord '{}'", chord),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
