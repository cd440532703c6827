//! TCP endpoint notation shared by the daemon and client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A `host:port` pair identifying the daemon's listening socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpEndpoint {
    pub host: String,
    pub port: u16,
}

impl TcpEndpoint {
    /// Builds an endpoint from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for TcpEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

impl FromStr for TcpEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (host, port_text) = input
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(input.to_owned()))?;
        if host.is_empty() {
            return Err(EndpointParseError::MissingHost(input.to_owned()));
        }
        let port = port_text
            .parse::<u16>()
            .map_err(|_| EndpointParseError::InvalidPort(port_text.to_owned()))?;
        Ok(Self::new(host, port))
    }
}

/// Errors encountered while parsing a [`TcpEndpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// No `:port` suffix was present.
    #[error("missing port in endpoint '{0}'")]
    MissingPort(String),
    /// The host part was empty.
    #[error("missing host in endpoint '{0}'")]
    MissingHost(String),
    /// The port part was not a valid 16-bit number.
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn parses_host_and_port() {
        let endpoint: TcpEndpoint = "127.0.0.1:50555".parse().expect("parse endpoint");
        assert_eq!(endpoint, TcpEndpoint::new("127.0.0.1", 50555));
        assert_eq!(endpoint.to_string(), "127.0.0.1:50555");
    }

    #[rstest]
    #[case("localhost")]
    #[case(":9000")]
    #[case("host:notaport")]
    #[case("host:70000")]
    fn rejects_malformed_endpoints(#[case] input: &str) {
        assert!(input.parse::<TcpEndpoint>().is_err());
    }
}
