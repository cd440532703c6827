//! Per-connection session lifecycle.
//!
//! Each accepted socket is served on its own thread. The handler reads the
//! newline-terminated identity line, creates the session, then alternates
//! between reading one framed request and writing one framed response until
//! the peer closes or a framing error makes the stream unusable.

use std::io::{self, Read};
use std::net::TcpStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use newswire_protocol::{FrameDecoder, Request, Response, read_message, write_message};

use crate::session::Session;
use crate::transport::ConnectionHandler;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::router::RequestRouter;

/// How long a fresh connection may take to present its identity line.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on the identity line, newline excluded.
const IDENTITY_LIMIT_BYTES: usize = 256;
const FALLBACK_NAME: &str = "client";

/// Connection handler implementing the session protocol.
pub struct SessionConnectionHandler {
    router: RequestRouter,
    next_connection_id: AtomicU64,
}

impl SessionConnectionHandler {
    /// Creates a handler routing all sessions through the given router.
    #[must_use]
    pub fn new(router: RequestRouter) -> Self {
        Self {
            router,
            next_connection_id: AtomicU64::new(0),
        }
    }

    fn serve(&self, stream: &mut TcpStream, session: &mut Session) {
        let mut decoder = FrameDecoder::new();
        loop {
            let value = match read_message::<_, Value>(stream, &mut decoder) {
                Ok(Some(value)) => value,
                Ok(None) => {
                    debug!(
                        target: DISPATCH_TARGET,
                        client = session.display_name(),
                        "peer closed at a frame boundary"
                    );
                    break;
                }
                Err(error) => {
                    warn!(
                        target: DISPATCH_TARGET,
                        client = session.display_name(),
                        %error,
                        "closing connection on framing error"
                    );
                    break;
                }
            };

            // A syntactically valid frame with the wrong request shape is
            // recoverable; only framing failures end the session.
            let response = match parse_request(value) {
                Ok(request) => self.router.dispatch(session, &request),
                Err(error) => {
                    warn!(
                        target: DISPATCH_TARGET,
                        client = session.display_name(),
                        %error,
                        "rejecting malformed request"
                    );
                    Response::error(error.to_string())
                }
            };

            if let Err(error) = write_message(stream, &response) {
                warn!(
                    target: DISPATCH_TARGET,
                    client = session.display_name(),
                    %error,
                    "failed to write response"
                );
                break;
            }
        }
    }
}

impl ConnectionHandler for SessionConnectionHandler {
    fn handle(&self, mut stream: TcpStream) {
        let connection_id = self.next_connection_id.fetch_add(1, Ordering::SeqCst) + 1;
        let peer = stream
            .peer_addr()
            .map_or_else(|_| "unknown".to_owned(), |addr| addr.to_string());

        let name = match read_identity(&mut stream) {
            Ok(Some(name)) => name,
            Ok(None) => {
                debug!(
                    target: DISPATCH_TARGET,
                    connection = connection_id,
                    peer,
                    "peer closed before the handshake"
                );
                return;
            }
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    connection = connection_id,
                    peer,
                    %error,
                    "handshake failed"
                );
                return;
            }
        };

        let mut session = Session::new(connection_id, name);
        info!(
            target: DISPATCH_TARGET,
            client = session.display_name(),
            connection = connection_id,
            peer,
            "session established"
        );
        self.serve(&mut stream, &mut session);
        info!(
            target: DISPATCH_TARGET,
            client = session.display_name(),
            connection = connection_id,
            "session closed"
        );
    }
}

fn parse_request(value: Value) -> Result<Request, DispatchError> {
    serde_json::from_value(value).map_err(|error| DispatchError::malformed(error.to_string()))
}

/// Reads the newline-terminated identity line that precedes framed traffic.
///
/// Bytes are consumed one at a time so nothing belonging to the first frame
/// is read past the newline. Returns `Ok(None)` when the peer closes before
/// sending anything.
fn read_identity(stream: &mut TcpStream) -> io::Result<Option<String>> {
    stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;

    let mut line = Vec::new();
    let mut byte = [0_u8; 1];
    loop {
        match stream.read(&mut byte) {
            Ok(0) => {
                if line.is_empty() {
                    stream.set_read_timeout(None)?;
                    return Ok(None);
                }
                break;
            }
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                if line.len() >= IDENTITY_LIMIT_BYTES {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "identity line too long",
                    ));
                }
                line.push(byte[0]);
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    stream.set_read_timeout(None)?;

    let name = String::from_utf8_lossy(&line).trim().to_owned();
    if name.is_empty() {
        Ok(Some(FALLBACK_NAME.to_owned()))
    } else {
        Ok(Some(name))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Arc;
    use std::thread;

    use serde_json::json;

    use newswire_protocol::{HeadlineDetails, HeadlineSummary, PayloadKind};

    use crate::provider::{
        Article, ContentProvider, HeadlineQuery, ProviderError, SourceQuery, SourceRecord,
    };

    use super::*;

    struct StubProvider {
        headlines: Vec<Article>,
        sources: Vec<SourceRecord>,
    }

    impl ContentProvider for StubProvider {
        fn fetch_headlines(&self, _query: &HeadlineQuery) -> Result<Vec<Article>, ProviderError> {
            Ok(self.headlines.clone())
        }

        fn fetch_sources(&self, _query: &SourceQuery) -> Result<Vec<SourceRecord>, ProviderError> {
            Ok(self.sources.clone())
        }
    }

    fn stub_articles(count: usize) -> Vec<Article> {
        (1..=count)
            .map(|n| Article {
                title: Some(format!("story {n}")),
                author: Some(format!("author {n}")),
                ..Article::default()
            })
            .collect()
    }

    fn spawn_server() -> SocketAddr {
        let provider = Arc::new(StubProvider {
            headlines: stub_articles(3),
            sources: vec![SourceRecord {
                name: Some("BBC News".into()),
                ..SourceRecord::default()
            }],
        });
        let handler = Arc::new(SessionConnectionHandler::new(RequestRouter::new(
            provider, None,
        )));
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("bound address");
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let handler = Arc::clone(&handler);
                thread::spawn(move || handler.handle(stream));
            }
        });
        addr
    }

    fn connect(addr: SocketAddr, name: &str) -> TcpStream {
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("read timeout");
        stream
            .write_all(format!("{name}\n").as_bytes())
            .expect("send identity");
        stream
    }

    fn roundtrip(stream: &mut TcpStream, decoder: &mut FrameDecoder, request: &Value) -> Response {
        write_message(stream, request).expect("send request");
        read_message(stream, decoder)
            .expect("read response")
            .expect("one response")
    }

    #[test]
    fn lists_then_details_over_one_connection() {
        let addr = spawn_server();
        let mut stream = connect(addr, "alice");
        let mut decoder = FrameDecoder::new();

        let list = roundtrip(
            &mut stream,
            &mut decoder,
            &json!({"option": "headlines", "parameters": {}}),
        );
        assert!(list.is_success());
        let rows: Vec<HeadlineSummary> = list.decode_data().expect("rows");
        assert_eq!(rows.len(), 3);

        let detail = roundtrip(
            &mut stream,
            &mut decoder,
            &json!({"option": "details", "parameters": {"kind": "headline", "index": 3}}),
        );
        assert_eq!(detail.kind, Some(PayloadKind::HeadlineDetails));
        let details: HeadlineDetails = detail.decode_data().expect("details");
        assert_eq!(details.title, "story 3");
    }

    #[test]
    fn malformed_request_shape_keeps_the_connection_open() {
        let addr = spawn_server();
        let mut stream = connect(addr, "bob");
        let mut decoder = FrameDecoder::new();

        let rejected = roundtrip(&mut stream, &mut decoder, &json!(["not", "a", "request"]));
        assert!(!rejected.is_success());
        assert!(
            rejected
                .message
                .as_deref()
                .is_some_and(|m| m.contains("malformed request"))
        );

        let recovered = roundtrip(
            &mut stream,
            &mut decoder,
            &json!({"option": "sources", "parameters": {}}),
        );
        assert!(recovered.is_success());
    }

    #[test]
    fn invalid_json_frame_closes_the_connection() {
        let addr = spawn_server();
        let mut stream = connect(addr, "carol");

        let payload = b"not json";
        let mut frame = u32::try_from(payload.len())
            .expect("fits u32")
            .to_be_bytes()
            .to_vec();
        frame.extend_from_slice(payload);
        stream.write_all(&frame).expect("send bad frame");

        let mut decoder = FrameDecoder::new();
        let closed: Option<Response> =
            read_message(&mut stream, &mut decoder).expect("clean close");
        assert!(closed.is_none());
    }

    #[test]
    fn sessions_do_not_share_cached_lists() {
        let addr = spawn_server();
        let mut first = connect(addr, "alice");
        let mut second = connect(addr, "alice");
        let mut first_decoder = FrameDecoder::new();
        let mut second_decoder = FrameDecoder::new();

        let list = roundtrip(
            &mut first,
            &mut first_decoder,
            &json!({"option": "headlines", "parameters": {}}),
        );
        assert!(list.is_success());

        // Same display name, different connection: no cached list.
        let denied = roundtrip(
            &mut second,
            &mut second_decoder,
            &json!({"option": "details", "parameters": {"kind": "headline", "index": 1}}),
        );
        assert!(!denied.is_success());
        assert!(
            denied
                .message
                .as_deref()
                .is_some_and(|m| m.contains("no prior headline results"))
        );

        let allowed = roundtrip(
            &mut first,
            &mut first_decoder,
            &json!({"option": "details", "parameters": {"kind": "headline", "index": 1}}),
        );
        assert!(allowed.is_success());
    }

    #[test]
    fn reconnecting_starts_with_an_empty_session() {
        let addr = spawn_server();
        {
            let mut stream = connect(addr, "dave");
            let mut decoder = FrameDecoder::new();
            let list = roundtrip(
                &mut stream,
                &mut decoder,
                &json!({"option": "headlines", "parameters": {}}),
            );
            assert!(list.is_success());
        }

        let mut stream = connect(addr, "dave");
        let mut decoder = FrameDecoder::new();
        let denied = roundtrip(
            &mut stream,
            &mut decoder,
            &json!({"option": "details", "parameters": {"kind": "headline", "index": 1}}),
        );
        assert!(!denied.is_success());
    }

    #[test]
    fn blank_identity_line_falls_back_to_a_placeholder() {
        let addr = spawn_server();
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("read timeout");
        stream.write_all(b"  \r\n").expect("send blank identity");

        let mut decoder = FrameDecoder::new();
        let response = roundtrip(
            &mut stream,
            &mut decoder,
            &json!({"option": "sources", "parameters": {}}),
        );
        assert!(response.is_success());
    }
}
