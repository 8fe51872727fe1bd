//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub frames: FrameConfig,

    #[serde(default)]
    pub bus: BusConfig,

    #[serde(default)]
    pub shortcuts: ShortcutConfig,
}

/// Scroll behaviour defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Lowest allowed speed (units per second).
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// Highest allowed speed (units per second).
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Speed of a freshly constructed controller.
    #[serde(default = "default_speed")]
    pub default_speed: f64,

    /// Speed change applied by the speed shortcuts.
    #[serde(default = "default_step")]
    pub step: f64,

    /// Speed change applied by the on-page control panel buttons.
    #[serde(default = "default_overlay_step")]
    pub overlay_step: f64,

    /// Distance to the bottom within which a container counts as "at bottom".
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Content growth below this margin is treated as layout noise.
    #[serde(default = "default_growth_margin")]
    pub growth_margin: f64,

    #[serde(default)]
    pub direction: ScrollDirection,

    /// Whether the on-page control panel is shown.
    #[serde(default = "default_true")]
    pub overlay_enabled: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            default_speed: default_speed(),
            step: default_step(),
            overlay_step: default_overlay_step(),
            threshold: default_threshold(),
            growth_margin: default_growth_margin(),
            direction: ScrollDirection::default(),
            overlay_enabled: true,
        }
    }
}

impl ScrollConfig {
    /// Clamp a speed into `[min_speed, max_speed]`. NaN clamps to `min_speed`.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.max(self.min_speed).min(self.max_speed)
    }
}

fn default_min_speed() -> f64 {
    50.0
}

fn default_max_speed() -> f64 {
    4000.0
}

pub(crate) fn default_speed() -> f64 {
    600.0
}

fn default_step() -> f64 {
    50.0
}

fn default_overlay_step() -> f64 {
    25.0
}

fn default_threshold() -> f64 {
    4.0
}

fn default_growth_margin() -> f64 {
    10.0
}

pub(crate) fn default_true() -> bool {
    true
}

/// Direction the tick loop moves the scroll offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Down,
    Up,
}

impl ScrollDirection {
    /// Sign applied to the per-frame advance.
    pub fn sign(&self) -> f64 {
        match self {
            Self::Down => 1.0,
            Self::Up => -1.0,
        }
    }
}

/// Frame pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Scheduled frames per second.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
        }
    }
}

impl FrameConfig {
    /// Time between two scheduled frames.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.rate_hz.max(1)))
    }
}

fn default_rate_hz() -> u32 {
    60
}

/// Coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Bounded wait for a direct state query to a page.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Bounded wait for a page to acknowledge a relayed command.
    #[serde(default = "default_relay_timeout_ms")]
    pub relay_timeout_ms: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            relay_timeout_ms: default_relay_timeout_ms(),
        }
    }
}

impl BusConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_millis(self.relay_timeout_ms)
    }
}

fn default_query_timeout_ms() -> u64 {
    250
}

fn default_relay_timeout_ms() -> u64 {
    1000
}

/// Global shortcut actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    StartStop,
    PauseResume,
    SpeedUp,
    SpeedDown,
}

impl ShortcutAction {
    /// Every action, in display order.
    pub const ALL: [ShortcutAction; 4] = [
        ShortcutAction::StartStop,
        ShortcutAction::PauseResume,
        ShortcutAction::SpeedUp,
        ShortcutAction::SpeedDown,
    ];

    /// Parse the platform command name (`start_stop`, `speed_up`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start_stop" => Some(Self::StartStop),
            "pause_resume" => Some(Self::PauseResume),
            "speed_up" => Some(Self::SpeedUp),
            "speed_down" => Some(Self::SpeedDown),
            _ => None,
        }
    }
}

/// Key chord bindings for global shortcuts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutConfig {
    /// Key chord (e.g. `Alt+Shift+S`) to action.
    #[serde(default = "default_bindings")]
    pub bindings: BTreeMap<String, ShortcutAction>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }
}

fn default_bindings() -> BTreeMap<String, ShortcutAction> {
    BTreeMap::from([
        ("Alt+Shift+S".to_string(), ShortcutAction::StartStop),
        ("Alt+Shift+P".to_string(), ShortcutAction::PauseResume),
        ("Alt+Shift+Up".to_string(), ShortcutAction::SpeedUp),
        ("Alt+Shift+Down".to_string(), ShortcutAction::SpeedDown),
    ])
}
