//! A single TCP connection to a named server.
//!
//! # Design
//! `Connection::open` either returns a connected socket or an error; there
//! is no half-open state. Candidates from name resolution are tried in order
//! and a socket that failed to connect is dropped before the next attempt.
//! The socket closes when the `Connection` is dropped.
//!
//! Reading stops at the first of: the peer closing the connection, the end
//! of the header block for responses that cannot have a body, or
//! `Content-Length` body bytes having arrived. A read that happens to fill
//! the buffer exactly is never mistaken for the end of the response. A close
//! before the header block ends, or before the declared body has arrived,
//! is a transport error carrying the bytes read so far.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::error::ClientError;
use crate::http::{self, RawResponse, HEADER_SEPARATOR};
use crate::network::Network;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_RECV_BUFFER_LEN: usize = 4096;

/// Tunables for `Connection::open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub port: u16,
    /// Size of the buffer each receive call reads into.
    pub recv_buffer_len: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            recv_buffer_len: DEFAULT_RECV_BUFFER_LEN,
        }
    }
}

#[derive(Debug)]
pub struct Connection {
    host: String,
    stream: TcpStream,
    recv_buffer_len: usize,
    live: Arc<AtomicUsize>,
}

impl Connection {
    /// Resolve `host` and connect to the first candidate that accepts.
    pub fn open(
        network: &Network,
        host: &str,
        options: &ConnectOptions,
    ) -> Result<Self, ClientError> {
        let candidates: Vec<SocketAddr> = (host, options.port)
            .to_socket_addrs()
            .map_err(|e| {
                debug!("resolving {host} failed: {e}");
                ClientError::Resolution {
                    host: host.to_string(),
                }
            })?
            .collect();

        if candidates.is_empty() {
            return Err(ClientError::Resolution {
                host: host.to_string(),
            });
        }
        debug!("{host} resolved to {} candidate(s)", candidates.len());

        let stream = connect_first(host, candidates)?;
        let live = network.counter();
        live.fetch_add(1, Ordering::SeqCst);
        Ok(Self {
            host: host.to_string(),
            stream,
            recv_buffer_len: options.recv_buffer_len.max(1),
            live,
        })
    }

    /// The hostname as given to `open`, used verbatim for the `Host` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Write every byte of `bytes`, continuing after short writes.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        debug!("sent {} bytes to {}", bytes.len(), self.host);
        Ok(())
    }

    /// Accumulate the reply to the request just sent.
    ///
    /// `expect_body` is false for HEAD requests, whose responses end at the
    /// header block whatever their `Content-Length` says.
    pub fn receive(&mut self, expect_body: bool) -> Result<RawResponse, ClientError> {
        let mut received = Vec::new();
        let mut buf = vec![0u8; self.recv_buffer_len];
        let mut framing = Framing::new(expect_body);

        loop {
            let n = match self.stream.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(
                        "receive from {} failed after {} bytes: {e}",
                        self.host,
                        received.len()
                    );
                    return Err(ClientError::Transport {
                        source: e,
                        partial: received,
                    });
                }
            };
            if n == 0 {
                if framing.truncated(received.len()) {
                    warn!(
                        "{} closed the connection after {} bytes of an incomplete response",
                        self.host,
                        received.len()
                    );
                    return Err(ClientError::Transport {
                        source: io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "peer closed before the response was complete",
                        ),
                        partial: received,
                    });
                }
                break;
            }
            received.extend_from_slice(&buf[..n]);
            if framing.advance(&received) {
                break;
            }
        }

        debug!("received {} bytes from {}", received.len(), self.host);
        Ok(RawResponse::new(received))
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        debug!("closed connection to {}", self.host);
    }
}

/// Connect to each candidate in turn; the first that accepts wins.
fn connect_first<I>(host: &str, candidates: I) -> Result<TcpStream, ClientError>
where
    I: IntoIterator<Item = SocketAddr>,
{
    for addr in candidates {
        match TcpStream::connect(addr) {
            Ok(stream) => {
                debug!("connected to {host} at {addr}");
                return Ok(stream);
            }
            Err(e) => debug!("connect to {addr} failed: {e}"),
        }
    }
    Err(ClientError::Connect {
        host: host.to_string(),
    })
}

/// Where the response ends, as far as is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    /// Header block not yet complete.
    Unknown,
    /// Total response length in bytes.
    At(usize),
    /// No declared length; the peer closing ends the response.
    Close,
}

/// Tracks response framing across reads.
///
/// The header separator is searched only in bytes not scanned before, and
/// the status and `Content-Length` are read once, when the header block
/// completes.
#[derive(Debug)]
struct Framing {
    expect_body: bool,
    scanned: usize,
    end: End,
}

impl Framing {
    fn new(expect_body: bool) -> Self {
        Self {
            expect_body,
            scanned: 0,
            end: End::Unknown,
        }
    }

    /// Whether `received`, everything read so far, is a whole response.
    fn advance(&mut self, received: &[u8]) -> bool {
        if self.end == End::Unknown {
            // Back up so a separator split across two reads is still found.
            let from = self.scanned.saturating_sub(HEADER_SEPARATOR.len() - 1);
            match http::find(received, HEADER_SEPARATOR, from) {
                Some(i) => self.end = self.end_after_headers(received, i + HEADER_SEPARATOR.len()),
                None => {
                    self.scanned = received.len();
                    return false;
                }
            }
        }
        match self.end {
            End::At(total) => received.len() >= total,
            End::Unknown | End::Close => false,
        }
    }

    fn end_after_headers(&self, received: &[u8], body_start: usize) -> End {
        if !self.expect_body || matches!(http::parse_status(received), Ok(204 | 304)) {
            return End::At(body_start);
        }
        match http::header_value(received, "Content-Length").and_then(|v| v.parse::<usize>().ok()) {
            Some(len) => End::At(body_start + len),
            None => End::Close,
        }
    }

    /// Whether the peer closing after `len` bytes cuts the response short.
    fn truncated(&self, len: usize) -> bool {
        match self.end {
            End::Unknown => true,
            End::At(total) => len < total,
            End::Close => false,
        }
    }
}
