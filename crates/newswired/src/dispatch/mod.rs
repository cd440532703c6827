//! Request dispatch for the session protocol.
//!
//! The connection handler owns the per-connection state machine
//! (`Handshaking -> Serving -> Closed`): it reads the identity line, then
//! loops reading one framed request, routing it, and writing exactly one
//! framed response. The router validates parameters against the catalogue,
//! executes list queries through the provider adapter, and resolves detail
//! lookups against the session's cached lists.
//!
//! Dispatch-level failures (malformed requests, unknown operations, provider
//! errors, cache misses) become `error` responses on the open connection;
//! only framing and socket failures close it.

mod errors;
mod handler;
mod router;

pub use self::errors::DispatchError;
pub use self::handler::SessionConnectionHandler;
pub use self::router::RequestRouter;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
