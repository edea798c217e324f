//! # Config
//!
//! Application settings, usually loaded from a TOML file:
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 720
//! resizable = true
//! fullscreen = false
//!
//! [frame]
//! control_flow = "poll"
//! max_delta_ms = 250
//! ```
//!
//! Missing sections and keys keep their default values.

use std::io;
use std::path::Path;
use std::time::Duration;

use log::debug;
use log::info;
use serde::Deserialize;

use crate::Error;
use crate::Result;

/// # Application Config
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Window settings.
    pub window: WindowConfig,
    /// Frame loop settings.
    pub frame: FrameConfig,
}

impl AppConfig {
    /// Parses the config from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Loads the config from the TOML file at the given path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_file(path, &source)
    }

    /// Loads the config from the given path, or returns the default config if the file doesn't
    /// exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => Self::parse_file(path, &source),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(Error::ConfigIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse_file(path: &Path, source: &str) -> Result<Self> {
        let config = Self::from_toml_str(source)?;
        debug!("loaded config from {}: {:?}", path.display(), config);

        Ok(config)
    }
}

/// # Window Config
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial inner width in physical pixels.
    pub width: u32,
    /// Initial inner height in physical pixels.
    pub height: u32,
    /// Whether the user can resize the window.
    pub resizable: bool,
    /// Start in borderless fullscreen on the current monitor.
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            resizable: true,
            fullscreen: false,
        }
    }
}

/// # Frame Config
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    /// How the event loop waits between frames.
    pub control_flow: ControlFlowMode,
    /// Upper bound for a single frame's delta time, in milliseconds.
    pub max_delta_ms: u64,
}

impl FrameConfig {
    /// Returns the maximum frame delta.
    pub fn max_delta(&self) -> Duration {
        Duration::from_millis(self.max_delta_ms)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            control_flow: ControlFlowMode::Poll,
            max_delta_ms: 250,
        }
    }
}

/// # Control Flow Mode
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ControlFlowMode {
    /// Update continuously, even without incoming events.
    #[default]
    Poll,
    /// Sleep until the next event arrives.
    Wait,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn from_toml_str_empty_returns_default() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn from_toml_str_partial_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [window]
            width = 800

            [frame]
            control_flow = "wait"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert!(config.window.resizable);
        assert_eq!(config.frame.control_flow, ControlFlowMode::Wait);
        assert_eq!(config.frame.max_delta(), Duration::from_millis(250));
    }

    #[test]
    fn from_toml_str_invalid_returns_parse_error() {
        let result = AppConfig::from_toml_str("[window]\nwidth = \"wide\"");

        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn from_toml_str_unknown_control_flow_returns_parse_error() {
        let result = AppConfig::from_toml_str("[frame]\ncontrol_flow = \"sometimes\"");

        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn load_returns_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\nfullscreen = true\nheight = 1080").unwrap();

        let config = AppConfig::load(file.path()).unwrap();

        assert!(config.window.fullscreen);
        assert_eq!(config.window.height, 1080);
    }

    #[test]
    fn load_missing_file_returns_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = AppConfig::load(dir.path().join("pulse.toml"));

        assert!(matches!(result, Err(Error::ConfigIo { .. })));
    }

    #[test]
    fn load_or_default_existing_file_returns_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[frame]\nmax_delta_ms = 100").unwrap();

        let config = AppConfig::load_or_default(file.path()).unwrap();

        assert_eq!(config.frame.max_delta(), Duration::from_millis(100));
    }

    #[test]
    fn load_or_default_directory_returns_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = AppConfig::load_or_default(dir.path());

        assert!(matches!(result, Err(Error::ConfigIo { .. })));
    }

    #[test]
    fn load_or_default_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::load_or_default(dir.path().join("pulse.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
    }
}
