//! Settings subcommand handlers.

use tracing::info;

use autoscroll_config::{Settings, SettingsStore};

use crate::cli::SettingsAction;

/// Handle settings subcommands.
pub(crate) fn handle_settings_command(
    store: &SettingsStore,
    action: SettingsAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Show => {
            print_settings(store, &store.load()?);
        }
        SettingsAction::Set {
            default_speed,
            overlay,
        } => {
            let mut settings = store.load()?;
            if let Some(speed) = default_speed {
                settings.default_speed = speed;
            }
            if let Some(overlay) = overlay {
                settings.overlay_enabled = overlay;
            }
            store.save(&settings)?;
            info!("Settings saved to {}", store.path().display());
            print_settings(store, &store.load()?);
        }
        SettingsAction::Reset => {
            store.save(&Settings::default())?;
            info!("Settings reset");
            print_settings(store, &Settings::default());
        }
    }
    Ok(())
}

fn print_settings(store: &SettingsStore, settings: &Settings) {
    println!("Settings file:   {}", store.path().display());
    println!("Default speed:   {}", settings.default_speed);
    println!(
        "Control panel:   {}",
        if settings.overlay_enabled { "shown" } else { "hidden" }
    );
}
