//! # Logger

use env_logger::Env;

use crate::Result;

/// Installs the global logger.
///
/// Filters are read from `RUST_LOG` and default to `info`, with `winit` limited to warnings.
/// Should be called once, early in `main`; later calls fail with [crate::Error::Logger].
pub fn init() -> Result<()> {
    let env = Env::default().default_filter_or("info,winit=warn");

    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()?;

    Ok(())
}
