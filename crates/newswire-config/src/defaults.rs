//! Default values shared by the binaries.

/// Default listening endpoint for the daemon.
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:50555";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default base URL of the upstream news provider.
pub const DEFAULT_PROVIDER_URL: &str = "https://newsapi.org/v2";
