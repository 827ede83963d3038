//! Minimal blocking HTTP/1.1 client.
//!
//! # Overview
//! Resolves a server name, opens one TCP connection on port 80, sends one
//! HEAD, GET, POST, PUT, DELETE or OPTIONS request and reads back the raw
//! response, from which the status code and body are derived on demand.
//!
//! # Design
//! - `Network` brackets the process: init before the first connection,
//!   drop after the last.
//! - `Connection` owns exactly one connected socket or does not exist.
//! - `HttpClient` splits every method into `build_*` (plain-data request)
//!   and a verb that sends it; verbs consume the client, so one connection
//!   carries one request.
//! - `RawResponse` stores bytes only; `status()` and `body()` reparse on
//!   every call.
//!
//! No TLS, keep-alive, chunked decoding, redirects or timeouts.

pub mod client;
pub mod connection;
pub mod error;
pub mod http;
pub mod network;

pub use client::HttpClient;
pub use connection::{ConnectOptions, Connection};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, RawResponse};
pub use network::Network;
