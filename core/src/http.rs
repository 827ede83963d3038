//! HTTP/1.1 wire types: the request descriptor and the raw response.
//!
//! # Design
//! `HttpRequest` is plain data. It is built by `HttpClient::build_*`,
//! serialized once with `to_bytes`, and then dropped. `RawResponse` keeps the
//! exact bytes read from the peer and derives the status code and body on
//! every call instead of caching a parsed form, so the bytes stay the single
//! source of truth.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Terminates the header block of an HTTP message.
pub(crate) const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Head,
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    /// The uppercase token used on the request line.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Head => "HEAD",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Whether requests with this method carry a content type and body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ClientError;

    /// Case-insensitive, so `get`, `Get` and `GET` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            HttpMethod::Head,
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Options,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| ClientError::UnknownMethod(s.to_string()))
    }
}

/// An HTTP request described as plain data.
///
/// Headers are kept in insertion order and written exactly as given. The
/// path is not validated; whatever the caller passes goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Serialize into wire format: request line, headers, blank line, body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {} HTTP/1.1\r\n", self.method, self.path);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut out = head.into_bytes();
        if let Some(body) = &self.body {
            out.extend_from_slice(body);
        }
        out
    }
}

/// The complete, unparsed bytes received for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    raw: Vec<u8>,
}

impl RawResponse {
    pub fn new(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    /// Numeric status code: the text between the first and second space.
    pub fn status(&self) -> Result<u16, ClientError> {
        parse_status(&self.raw)
    }

    /// Everything after the first blank line that ends the header block.
    pub fn body(&self) -> Result<&[u8], ClientError> {
        header_end(&self.raw)
            .map(|end| &self.raw[end..])
            .ok_or_else(|| ClientError::Parse("no header/body separator".to_string()))
    }

    /// Value of the first header named `name`, compared case-insensitively.
    ///
    /// Returns `None` when the header is absent or the header block is
    /// incomplete.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.raw, name)
    }
}

pub(crate) fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Offset of the first body byte, if the header block is complete.
pub(crate) fn header_end(raw: &[u8]) -> Option<usize> {
    find(raw, HEADER_SEPARATOR, 0).map(|i| i + HEADER_SEPARATOR.len())
}

pub(crate) fn parse_status(raw: &[u8]) -> Result<u16, ClientError> {
    let first = find(raw, b" ", 0)
        .ok_or_else(|| ClientError::Parse("status line has no space".to_string()))?;
    let second = find(raw, b" ", first + 1)
        .ok_or_else(|| ClientError::Parse("status line has no second space".to_string()))?;

    let code = std::str::from_utf8(&raw[first + 1..second])
        .map_err(|_| ClientError::Parse("status code is not text".to_string()))?;
    // `u16::from_str` alone would also take a leading `+`.
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::Parse(format!("invalid status code {code:?}")));
    }
    code.parse::<u16>()
        .map_err(|_| ClientError::Parse(format!("invalid status code {code:?}")))
}

pub(crate) fn header_value<'a>(raw: &'a [u8], name: &str) -> Option<&'a str> {
    let end = find(raw, HEADER_SEPARATOR, 0)?;
    // Skip the status line; the header block starts after its CRLF.
    let start = find(raw, b"\r\n", 0)? + 2;
    if start > end {
        return None;
    }

    raw[start..end]
        .split(|&b| b == b'\n')
        .filter_map(|line| std::str::from_utf8(line).ok())
        .filter_map(|line| line.trim_end_matches('\r').split_once(':'))
        .find(|(n, _)| n.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim())
}
