//! Error types for the blocking HTTP client.
//!
//! # Design
//! Every failure the client can hit is one variant of `ClientError`. The
//! four network-facing kinds map to the four stages a request goes through:
//! resolving the host, connecting, moving bytes, and interpreting the reply.
//! None of them is retried; they surface to the caller as-is.

use std::fmt;
use std::io;

/// Errors returned by `Connection`, `HttpClient` and `RawResponse`.
#[derive(Debug)]
pub enum ClientError {
    /// The hostname could not be resolved to any address.
    Resolution { host: String },

    /// Resolution succeeded but no candidate address accepted a connection.
    Connect { host: String },

    /// A send or receive failed on an established connection, or the peer
    /// closed before the response was complete. `partial` holds every byte
    /// received before the failure.
    Transport { source: io::Error, partial: Vec<u8> },

    /// The response lacks a well-formed status line or header/body separator.
    Parse(String),

    /// A method name that is not one of HEAD, GET, POST, PUT, DELETE, OPTIONS.
    UnknownMethod(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Resolution { host } => write!(f, "could not resolve host {host}"),
            ClientError::Connect { host } => write!(f, "couldn't connect to server {host}"),
            ClientError::Transport { source, partial } => {
                write!(f, "transport error after {} bytes: {source}", partial.len())
            }
            ClientError::Parse(msg) => write!(f, "malformed response: {msg}"),
            ClientError::UnknownMethod(name) => {
                write!(f, "unrecognized http operation: {name}")
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(source: io::Error) -> Self {
        ClientError::Transport {
            source,
            partial: Vec::new(),
        }
    }
}
