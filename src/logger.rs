//! Tracing subscriber setup driven by [`LoggerSettings`].

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggerSettings};
use crate::{Error, Result};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Builds the event filter.
///
/// `RUST_LOG` wins when it is set and valid, then `override_filter`, then the
/// configured level applied to this crate only.
pub fn filter(settings: &LoggerSettings) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = settings
        .override_filter
        .clone()
        .unwrap_or_else(|| format!("{CRATE_TARGET}={}", settings.level));
    EnvFilter::try_new(&directive).map_err(|source| Error::LogFilter { directive, source })
}

/// Installs the global subscriber when logging is enabled.
///
/// A subscriber that is already installed is left in place.
pub fn init(settings: &LoggerSettings) -> Result<()> {
    if !settings.enable {
        return Ok(());
    }

    let builder = fmt()
        .with_env_filter(filter(settings)?)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match settings.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    match installed {
        Ok(()) => debug!(format = ?settings.format, "logger_initialized"),
        Err(err) => debug!(error = %err, "logger_already_initialized"),
    }
    Ok(())
}
