//! Error types for the interactive client.

use std::io;

use thiserror::Error;

use newswire_protocol::FrameError;

/// Failures that end the client session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// Console read or write failed.
    #[error("console error: {0}")]
    Console(#[from] io::Error),
    /// Framed exchange with the server failed.
    #[error("server connection error: {0}")]
    Frame(#[from] FrameError),
    /// Server closed the connection while a response was expected.
    #[error("server closed the connection")]
    ServerClosed,
}
