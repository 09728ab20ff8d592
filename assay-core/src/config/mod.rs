//! Shared configuration.
//!
//! This module introduces types to configure the ambient behavior of a test
//! binary using assay, which comes down to how assertion activity is logged.
//!
//! # Features:
//! - [`Config`]: Represents the main configuration structure. It's adorned with
//!   [`clap`] attributes so a test runner can flatten it into its own command
//!   line, and every option falls back to an environment variable.
//! - [`LogFormat`]: Specifies how log lines are rendered.
//!
//! # Usage:
//! [`Config::from_env`] reads a `.env` file, if present, then resolves the
//! options from the environment alone. The resulting [`Config`] can be passed
//! to [`init::tracing`](crate::init::tracing).

use clap::{Args, Parser, ValueEnum};
use dotenvy::dotenv;
use thiserror::Error;

const DEFAULT_LOG_FILTER: &str = "warn";
const HELP_HEADING: &str = "Assay options";

/// Represents the main configuration structure.
#[derive(Args, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Config {
    /// Filter directives for assertion logging, in `tracing_subscriber`'s
    /// `EnvFilter` syntax.
    #[arg(long, help_heading = HELP_HEADING, env = "ASSAY_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Determines how log lines are rendered.
    #[arg(long, help_heading = HELP_HEADING, env = "ASSAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: Default::default(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct EnvOnly {
    #[command(flatten)]
    config: Config,
}

impl Config {
    /// Resolve the configuration from the environment, after loading `.env`.
    ///
    /// Variables that are not set take their defaults. Invalid values are
    /// reported as [`ConfigError::Args`].
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let parsed = EnvOnly::try_parse_from(std::iter::empty::<String>())?;
        Ok(parsed.config)
    }
}

/// Enumerates the available log renderings.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, ValueEnum, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Full,
}

/// Errors raised while resolving a [`Config`] or installing its subscriber.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Args(#[from] clap::Error),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install the tracing subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync + 'static>),
}
