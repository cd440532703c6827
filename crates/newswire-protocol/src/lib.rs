//! Wire protocol shared by the newswire daemon and client.
//!
//! Every message travels as a length-prefixed frame: a 4-byte big-endian
//! payload length followed by that many UTF-8 bytes holding one JSON value.
//! The [`frame`] module owns the codec; [`message`] defines the request and
//! response envelopes plus the summary and detail payload shapes; [`catalog`]
//! holds the allow-listed filter values both binaries agree on.

pub mod catalog;
pub mod frame;
pub mod message;

pub use catalog::{Category, Country, Language};
pub use frame::{FrameDecoder, FrameError, MAX_FRAME_BYTES, read_message, write_message};
pub use message::{
    HeadlineDetails, HeadlineSummary, PayloadKind, Request, RequestParam, Response,
    ResponseStatus, ResultKind, SourceDetails, SourceSummary,
};
