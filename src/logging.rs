//! Tracing setup
//!
//! The terminal belongs to the UI, so events go to a log file. Without a
//! file nothing is written.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{RehearsalError, Result};

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, file_path: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("rehearsal_room={level},rehearse={level}")))
        .map_err(|e| RehearsalError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match file_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));

            registry
                .with(file_layer)
                .try_init()
                .map_err(|e| RehearsalError::Logging(e.to_string()))
        }
        None => registry
            .try_init()
            .map_err(|e| RehearsalError::Logging(e.to_string())),
    }
}
