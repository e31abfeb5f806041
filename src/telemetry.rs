use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Installs the global JSON subscriber. `RUST_LOG` takes precedence over
/// `default_level`.
pub fn init(default_level: &str) -> Result<()> {
    let level = default_level.parse::<LevelFilter>().map_err(|_| {
        AppError::config(format!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            default_level
        ))
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| AppError::internal(format!("Failed to install tracing subscriber: {}", e)))
}
