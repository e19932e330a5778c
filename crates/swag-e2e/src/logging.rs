//! Tracing subscriber setup

use crate::config::{CliConfig, LogFormat};
use crate::error::{CliError, CliResult};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
#[must_use]
pub fn default_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(format!(
        "swag_pom={0},swag_e2e={0}",
        config.verbosity.log_directive()
    ))
}

/// Install the global subscriber; log lines go to stderr
pub fn init_tracing(config: &CliConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false);

    let installed = match config.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| CliError::config(format!("cannot install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Verbosity;

    #[test]
    fn test_default_filter_follows_verbosity() {
        let config = CliConfig::new().with_verbosity(Verbosity::Debug);
        let filter = default_filter(&config).to_string().to_lowercase();
        assert!(filter.contains("swag_pom=debug"));
        assert!(filter.contains("swag_e2e=debug"));
    }

    #[test]
    fn test_quiet_filter() {
        let config = CliConfig::new().with_verbosity(Verbosity::Quiet);
        assert!(default_filter(&config)
            .to_string()
            .to_lowercase()
            .contains("swag_pom=error"));
    }
}
