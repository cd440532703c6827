//! Length-prefixed framing over a stream socket.
//!
//! Frames are self-delimiting: a 4-byte big-endian length followed by exactly
//! that many payload bytes. The decoder buffers partial reads and yields one
//! complete payload per call; it never parses a partial payload and never
//! relies on connection close (or speculative JSON parsing) to find a message
//! boundary.

use std::io::{self, Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Maximum payload size accepted on either side of the connection.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

const LENGTH_PREFIX_BYTES: usize = 4;
const READ_CHUNK_BYTES: usize = 4096;

/// Errors surfaced while framing or deframing messages.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Declared payload length exceeds the sane maximum.
    #[error("frame of {declared} bytes exceeds {max} byte limit")]
    Oversized { declared: usize, max: usize },

    /// Stream ended in the middle of a frame.
    #[error("stream closed mid-frame with {buffered} bytes pending")]
    Truncated { buffered: usize },

    /// Payload bytes were not valid UTF-8.
    #[error("frame payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Payload text was not the expected JSON value.
    #[error("frame payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Underlying socket read or write failed.
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// Incremental decoder that accumulates bytes until a full frame is present.
///
/// Feed arbitrary slices with [`FrameDecoder::push`]; [`FrameDecoder::try_payload`]
/// returns `Ok(None)` while the buffer holds less than one complete frame.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends received bytes to the internal buffer.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// True when no partial frame is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Attempts to extract one complete payload from the buffer.
    ///
    /// Returns `Ok(None)` when more bytes are needed. Bytes beyond the first
    /// complete frame stay buffered for the next call.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Oversized`] when the declared length exceeds
    /// [`MAX_FRAME_BYTES`] and [`FrameError::InvalidUtf8`] when the payload is
    /// not UTF-8 text.
    pub fn try_payload(&mut self) -> Result<Option<String>, FrameError> {
        if self.buffer.len() < LENGTH_PREFIX_BYTES {
            return Ok(None);
        }

        let mut prefix = [0_u8; LENGTH_PREFIX_BYTES];
        prefix.copy_from_slice(&self.buffer[..LENGTH_PREFIX_BYTES]);
        let declared = u32::from_be_bytes(prefix) as usize;

        if declared > MAX_FRAME_BYTES {
            return Err(FrameError::Oversized {
                declared,
                max: MAX_FRAME_BYTES,
            });
        }

        let total = LENGTH_PREFIX_BYTES + declared;
        if self.buffer.len() < total {
            return Ok(None);
        }

        let payload: Vec<u8> = self
            .buffer
            .drain(..total)
            .skip(LENGTH_PREFIX_BYTES)
            .collect();
        Ok(Some(String::from_utf8(payload)?))
    }
}

/// Reads one framed message from the stream, buffering across partial reads.
///
/// Returns `Ok(None)` when the peer closes the connection at a frame
/// boundary. A close in the middle of a frame is reported as
/// [`FrameError::Truncated`].
///
/// # Errors
///
/// Returns a [`FrameError`] for oversized frames, malformed payloads, and
/// socket failures.
pub fn read_message<R, T>(reader: &mut R, decoder: &mut FrameDecoder) -> Result<Option<T>, FrameError>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut chunk = [0_u8; READ_CHUNK_BYTES];
    loop {
        if let Some(payload) = decoder.try_payload()? {
            return Ok(Some(serde_json::from_str(&payload)?));
        }

        let bytes_read = read_with_retry(reader, &mut chunk)?;
        if bytes_read == 0 {
            if decoder.is_empty() {
                return Ok(None);
            }
            return Err(FrameError::Truncated {
                buffered: decoder.buffer.len(),
            });
        }
        decoder.push(&chunk[..bytes_read]);
    }
}

/// Serializes one message and writes it as a single frame.
///
/// # Errors
///
/// Returns [`FrameError::Oversized`] when the encoded payload exceeds
/// [`MAX_FRAME_BYTES`], and propagates serialization and socket failures.
pub fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), FrameError>
where
    W: Write,
    T: Serialize,
{
    let payload = serde_json::to_vec(message)?;
    if payload.len() > MAX_FRAME_BYTES {
        return Err(FrameError::Oversized {
            declared: payload.len(),
            max: MAX_FRAME_BYTES,
        });
    }
    let prefix = u32::try_from(payload.len())
        .map_err(|_| FrameError::Oversized {
            declared: payload.len(),
            max: MAX_FRAME_BYTES,
        })?
        .to_be_bytes();
    writer.write_all(&prefix)?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

/// Encodes a message into a standalone frame buffer.
///
/// # Errors
///
/// Returns [`FrameError::Oversized`] when the payload exceeds the frame limit.
pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>, FrameError> {
    let mut buffer = Vec::new();
    write_message(&mut buffer, message)?;
    Ok(buffer)
}

fn read_with_retry<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
}
