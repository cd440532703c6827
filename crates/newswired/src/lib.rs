//! The newswire daemon.
//!
//! `newswired` accepts TCP connections carrying the length-prefixed JSON
//! protocol defined in `newswire-protocol`. Each connection performs a short
//! identity handshake, then loops through request dispatch: list queries hit
//! the upstream news provider and replace the session's cached result lists,
//! while detail lookups resolve 1-based positions against those cached lists.
//! Session state is owned by its connection thread and torn down with it;
//! nothing is shared between connections except the provider adapter.

pub mod archive;
pub mod dispatch;
pub mod provider;
pub mod session;
pub mod telemetry;
pub mod transport;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use newswire_config::Config;

use crate::archive::Archive;
use crate::dispatch::{RequestRouter, SessionConnectionHandler};
use crate::provider::NewsApiProvider;
use crate::telemetry::TelemetryError;
use crate::transport::{ListenerError, SocketListener};

/// Errors that abort daemon startup or shut the listener down.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    /// Listener setup or teardown failed.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Runs the daemon until the listener stops.
///
/// # Errors
///
/// Returns a [`RuntimeError`] when telemetry cannot be installed or the
/// listener fails to bind.
pub fn run(config: &Config) -> Result<(), RuntimeError> {
    telemetry::initialise(config)?;

    let provider = Arc::new(NewsApiProvider::from_config(config));
    let archive = config.archive_dir.clone().map(Archive::new);
    let router = RequestRouter::new(provider, archive);
    let handler = Arc::new(SessionConnectionHandler::new(router));

    let listener = SocketListener::bind(&config.listen)?;
    info!(endpoint = %config.listen, "newswired listening");
    let handle = listener.start(handler)?;
    handle.join()?;
    Ok(())
}
