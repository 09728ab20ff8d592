//! Logging setup for test binaries.
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError, LogFormat};

/// Install a global `tracing` subscriber configured by `config`.
///
/// Output goes through the test writer, so it is captured per test by the
/// standard test harness. Fails if the filter does not parse or if a global
/// subscriber is already installed.
///
/// ```
/// use assay::{config::Config, init};
///
/// let config = Config {
///     log_filter: "assay=debug".to_string(),
///     ..Default::default()
/// };
/// init::tracing(&config).unwrap();
/// assert!(init::tracing(&config).is_err());
/// ```
pub fn tracing(config: &Config) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(&config.log_filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer();

    match config.log_format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Full => builder.try_init(),
    }
    .map_err(ConfigError::Install)
}
