//! Command-line arguments for the interactive client.

use clap::Parser;

use newswire_config::{DEFAULT_ENDPOINT, TcpEndpoint};

/// Arguments resolved from flags and environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "newswire", about = "Interactive news session client", version)]
pub struct Cli {
    /// Server endpoint to connect to.
    #[arg(long, env = "NEWSWIRE_SERVER", default_value = DEFAULT_ENDPOINT)]
    pub server: TcpEndpoint,

    /// Display name sent during the handshake; prompted for when omitted.
    #[arg(long)]
    pub name: Option<String>,
}
