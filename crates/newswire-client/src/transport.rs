//! Socket transport for the interactive client.
//!
//! [`Connection`] owns the TCP stream and frame decoder; the menu layer only
//! depends on the [`ServerLink`] trait so it can be exercised against a
//! scripted peer in tests.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use newswire_config::TcpEndpoint;
use newswire_protocol::{FrameDecoder, Request, Response, read_message, write_message};

use crate::errors::AppError;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// One request/response exchange with the server.
pub trait ServerLink {
    /// Sends one request and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] when the exchange fails or the server closes
    /// the connection instead of responding.
    fn exchange(&mut self, request: &Request) -> Result<Response, AppError>;
}

/// Live connection to a newswire daemon.
pub struct Connection {
    stream: TcpStream,
    decoder: FrameDecoder,
}

impl Connection {
    /// Connects to the endpoint and performs the identity handshake.
    ///
    /// # Errors
    ///
    /// Returns an [`AppError`] when resolution, connection, or the handshake
    /// write fails.
    pub fn open(endpoint: &TcpEndpoint, name: &str) -> Result<Self, AppError> {
        let address = resolve(endpoint).map_err(|source| AppError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let mut stream = TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT).map_err(
            |source| AppError::Connect {
                endpoint: endpoint.to_string(),
                source,
            },
        )?;
        stream.write_all(name.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;
        Ok(Self {
            stream,
            decoder: FrameDecoder::new(),
        })
    }
}

impl ServerLink for Connection {
    fn exchange(&mut self, request: &Request) -> Result<Response, AppError> {
        write_message(&mut self.stream, request)?;
        read_message(&mut self.stream, &mut self.decoder)?.ok_or(AppError::ServerClosed)
    }
}

fn resolve(endpoint: &TcpEndpoint) -> io::Result<SocketAddr> {
    let mut addrs = (endpoint.host.as_str(), endpoint.port).to_socket_addrs()?;
    addrs
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
