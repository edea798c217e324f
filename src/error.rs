use std::path::PathBuf;

use thiserror::Error;

use crate::scene::HierarchyError;

/// # Error
///
/// Errors returned by the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The window event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The operating system refused to create the application window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigIo {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or doesn't match the expected layout.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A global logger was already installed.
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// A scene hierarchy edit was rejected.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// Result type used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;
