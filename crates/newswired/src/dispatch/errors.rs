//! Error types for request dispatch failures.
//!
//! Every variant here is recoverable: the handler converts it into an
//! `error` response and keeps the connection open. Connection-fatal failures
//! (framing, sockets) live in the protocol crate's `FrameError`.

use thiserror::Error;

use newswire_protocol::ResultKind;

use crate::provider::ProviderError;
use crate::session::LookupError;

/// Errors surfaced while decoding, validating, or executing a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request payload was valid JSON but not a valid request shape.
    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    /// Option field named an operation outside the protocol.
    #[error("unknown operation '{option}'")]
    UnknownOperation { option: String },

    /// A required parameter was absent.
    #[error("missing parameter '{name}'")]
    MissingParameter { name: &'static str },

    /// A required parameter had the wrong type or an unusable value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// Detail lookup against an empty cache.
    #[error("no prior {kind} results in this session")]
    NoPriorResults { kind: ResultKind },

    /// Detail lookup outside the cached list.
    #[error("index {index} is outside the current {kind} list (1..={len})")]
    IndexOutOfRange {
        kind: ResultKind,
        index: i64,
        len: usize,
    },

    /// Upstream provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Response payload could not be encoded.
    #[error("failed to encode response payload: {0}")]
    EncodePayload(#[from] serde_json::Error),
}

impl DispatchError {
    /// Creates a malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Creates an unknown operation error.
    pub fn unknown_operation(option: impl Into<String>) -> Self {
        Self::UnknownOperation {
            option: option.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

impl From<LookupError> for DispatchError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::NoPriorResults { kind } => Self::NoPriorResults { kind },
            LookupError::IndexOutOfRange { kind, index, len } => {
                Self::IndexOutOfRange { kind, index, len }
            }
        }
    }
}
