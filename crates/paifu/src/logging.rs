//! Log subscriber setup.
//!
//! The libraries only emit `tracing` events. A binary installs one
//! subscriber at startup from its [`LoggingConfig`]:
//!
//! - events go to stderr, leaving stdout for output documents;
//! - `RUST_LOG`, when set, replaces the configured filter;
//! - `json` switches to one JSON object per event.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::{LoggingConfig, PaifuError};

/// The filter for `config`, unless `RUST_LOG` overrides it.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, PaifuError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| PaifuError::Logging(format!("{}: {e}", config.filter))),
    }
}

/// Installs the global subscriber.
///
/// # Errors
/// Fails on an invalid filter directive, or when a subscriber is already
/// installed.
pub fn try_init(config: &LoggingConfig) -> Result<(), PaifuError> {
    let filter = env_filter(config)?;
    let layer = if config.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_target(true).with_writer(std::io::stderr).boxed()
    };
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| PaifuError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_rejects_bad_directive() {
        let config = LoggingConfig {
            filter: "paifu=notalevel".into(),
            json: false,
        };
        // RUST_LOG would replace the directive under test.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(env_filter(&config), Err(PaifuError::Logging(_))));
        }
    }

    #[test]
    fn test_env_filter_accepts_default() {
        assert!(env_filter(&LoggingConfig::default()).is_ok());
    }
}
