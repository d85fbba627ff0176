//! Tracing/logging bootstrap.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global tracing subscriber.
///
/// The filter honors `RUST_LOG` and defaults to `info`; the output format
/// follows `telemetry.log_format` in the settings.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match settings.log_format {
        LogFormat::Pretty => builder
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to install tracing subscriber")?,
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to install tracing subscriber")?,
    }

    tracing::info!(
        target: "bookshelf-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_installs_the_global_subscriber_once() {
        let settings = TelemetrySettings::default();

        // First call installs the subscriber; a second install must fail.
        assert!(init(&settings).is_ok());
        assert!(init(&settings).is_err());
    }
}
