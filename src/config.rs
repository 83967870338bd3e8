//! TOML configuration for device wiring and loop timing.
//!
//! Everything here is wiring external to the normalizer core: which
//! connection index backs which logical device, which raw button shifts
//! gear, the initial source/scheme and the cycle period. The deadband is a
//! fixed constant and deliberately not configurable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::input::{ControlScheme, InputSource};

// Config errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SwervepilotConfig {
    /// Which physical devices back the logical inputs at startup.
    pub source: InputSource,

    /// Drive scheme at startup.
    pub scheme: ControlScheme,

    /// Connection index of the combined gamepad.
    pub gamepad_index: usize,

    /// Connection indices of the dedicated movement/rotation joysticks.
    pub left_joystick_index: usize,
    pub right_joystick_index: usize,

    /// Raw button on the movement joystick that shifts to low gear while
    /// held.
    pub shift_button: u32,

    /// Teleop cycle period in milliseconds.
    pub cycle_interval_ms: u64,
}

impl Default for SwervepilotConfig {
    fn default() -> Self {
        Self {
            source: InputSource::Gamepad,
            scheme: ControlScheme::HaloDrive,
            gamepad_index: 0,
            left_joystick_index: 0,
            right_joystick_index: 1,
            shift_button: 2,
            cycle_interval_ms: 20,
        }
    }
}

impl SwervepilotConfig {
    /// Default config file location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("swervepilot").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the config from the default location, falling back to defaults
    /// when the file is missing or unreadable.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("No config directory on this platform, using default config");
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Could not load config from {} ({}), using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_gamepad_halo_drive() {
        let config = SwervepilotConfig::default();
        assert_eq!(config.source, InputSource::Gamepad);
        assert_eq!(config.scheme, ControlScheme::HaloDrive);
        assert_eq!(config.shift_button, 2);
        assert_eq!(config.cycle_interval_ms, 20);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = SwervepilotConfig::default();
        config.source = InputSource::DualJoystick;
        config.scheme = ControlScheme::AngleDrive;
        config.cycle_interval_ms = 50;

        config.save(&path).unwrap();
        let loaded = SwervepilotConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn parses_handwritten_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
source = "DualJoystick"
scheme = "AngleDrive"
gamepad_index = 0
left_joystick_index = 1
right_joystick_index = 2
shift_button = 3
cycle_interval_ms = 10
"#,
        )
        .unwrap();

        let config = SwervepilotConfig::load(&path).unwrap();
        assert_eq!(config.source, InputSource::DualJoystick);
        assert_eq!(config.scheme, ControlScheme::AngleDrive);
        assert_eq!(config.right_joystick_index, 2);
    }

    #[test]
    fn load_of_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SwervepilotConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
