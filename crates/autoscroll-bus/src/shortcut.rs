//! Global shortcut translation.
//!
//! The platform reports either a key chord or a named command; both resolve
//! to a [`ShortcutAction`], which becomes a controller [`Command`].

use std::collections::HashMap;

use autoscroll_config::{ShortcutAction, ShortcutConfig};
use autoscroll_protocols::Command;

/// Maps key chords and command names to controller commands.
pub struct ShortcutBridge {
    chords: HashMap<String, ShortcutAction>,
    step: f64,
}

impl ShortcutBridge {
    /// Build from the configured bindings. `step` is the speed change of
    /// the speed shortcuts.
    pub fn new(config: &ShortcutConfig, step: f64) -> Self {
        let chords = config
            .bindings
            .iter()
            .map(|(chord, action)| (normalize(chord), *action))
            .collect();
        Self { chords, step }
    }

    /// Resolve a key chord such as `alt+shift+s`. Case and spacing are ignored.
    pub fn action_for_chord(&self, chord: &str) -> Option<ShortcutAction> {
        self.chords.get(&normalize(chord)).copied()
    }

    /// Resolve a platform command name such as `speed_up`.
    pub fn action_for_name(&self, name: &str) -> Option<ShortcutAction> {
        ShortcutAction::from_name(name)
    }

    pub fn command_for(&self, action: ShortcutAction) -> Command {
        match action {
            ShortcutAction::StartStop => Command::ToggleStartStop,
            ShortcutAction::PauseResume => Command::TogglePauseResume,
            ShortcutAction::SpeedUp => Command::AdjustSpeed { delta: self.step },
            ShortcutAction::SpeedDown => Command::AdjustSpeed { delta: -self.step },
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

fn normalize(chord: &str) -> String {
    chord
        .split('+')
        .map(|key| key.trim().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("+")
}
