//! Shared configuration for the newswire daemon and client.
//!
//! Both binaries agree on the endpoint notation and logging knobs defined
//! here; the daemon additionally loads provider credentials and the archive
//! location through [`Config`].

mod defaults;
mod endpoint;
mod logging;

use std::path::PathBuf;

use clap::Parser;

pub use defaults::{DEFAULT_ENDPOINT, DEFAULT_LOG_FILTER, DEFAULT_PROVIDER_URL};
pub use endpoint::{EndpointParseError, TcpEndpoint};
pub use logging::LogFormat;

/// Daemon configuration resolved from command-line flags and environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "newswired", about = "News session daemon", version)]
pub struct Config {
    /// TCP endpoint the daemon listens on.
    #[arg(long, env = "NEWSWIRE_LISTEN", default_value = DEFAULT_ENDPOINT)]
    pub listen: TcpEndpoint,

    /// API key for the upstream news provider.
    #[arg(long, env = "NEWSWIRE_API_KEY")]
    pub api_key: String,

    /// Base URL of the upstream provider API.
    #[arg(long, env = "NEWSWIRE_PROVIDER_URL", default_value = DEFAULT_PROVIDER_URL)]
    pub provider_url: String,

    /// Directory receiving raw provider payload archives; archiving is
    /// disabled when unset.
    #[arg(long, env = "NEWSWIRE_ARCHIVE_DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Tracing filter expression.
    #[arg(long, env = "NEWSWIRE_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Log output format.
    #[arg(long, env = "NEWSWIRE_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from process arguments and environment.
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_key_is_given() {
        let config =
            Config::try_parse_from(["newswired", "--api-key", "secret"]).expect("parse config");
        assert_eq!(config.listen, TcpEndpoint::new("127.0.0.1", 50555));
        assert_eq!(config.provider_url, DEFAULT_PROVIDER_URL);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
        assert!(config.archive_dir.is_none());
    }

    #[test]
    fn listen_flag_overrides_default_endpoint() {
        let config = Config::try_parse_from([
            "newswired",
            "--api-key",
            "secret",
            "--listen",
            "0.0.0.0:9900",
            "--log-format",
            "json",
        ])
        .expect("parse config");
        assert_eq!(config.listen, TcpEndpoint::new("0.0.0.0", 9900));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_api_key_fails_fast() {
        assert!(Config::try_parse_from(["newswired"]).is_err());
    }
}
