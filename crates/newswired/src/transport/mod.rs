//! TCP listener for the daemon endpoint.
//!
//! The transport module binds the configured endpoint and accepts
//! connections in a background thread, handing each accepted stream to a
//! [`ConnectionHandler`] on its own worker thread.

mod errors;
mod listener;

use std::net::TcpStream;

pub use self::errors::ListenerError;
pub use self::listener::{ListenerHandle, SocketListener};

pub(crate) const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Handles accepted socket connections.
///
/// Implementations run on a dedicated thread per connection and should avoid
/// panicking; returning ends the connection.
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Serves a single connection until it closes.
    fn handle(&self, stream: TcpStream);
}
