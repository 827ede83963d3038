//! Request builders and one-shot verbs over a single `Connection`.
//!
//! # Design
//! Each method is split into a `build_*` method that produces an
//! `HttpRequest` without touching the network, and a verb that sends it.
//! Verbs take `self` by value: a client issues exactly one request, and its
//! connection is closed when the verb returns. Headers are written in a fixed
//! order per method and `Content-Length` counts body bytes only.

use log::debug;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, RawResponse};

/// Blocking HTTP/1.1 client bound to one connected server.
#[derive(Debug)]
pub struct HttpClient {
    connection: Connection,
}

impl HttpClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn host(&self) -> &str {
        self.connection.host()
    }

    pub fn build_head(&self, resource: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Head,
            path: resource.to_string(),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                self.host_header(),
            ],
            body: None,
        }
    }

    pub fn build_get(&self, resource: &str) -> HttpRequest {
        self.bodiless(HttpMethod::Get, resource)
    }

    pub fn build_post(&self, resource: &str, content_type: &str, content: &[u8]) -> HttpRequest {
        self.with_content(HttpMethod::Post, resource, content_type, content)
    }

    pub fn build_put(&self, resource: &str, content_type: &str, content: &[u8]) -> HttpRequest {
        self.with_content(HttpMethod::Put, resource, content_type, content)
    }

    pub fn build_delete(&self, resource: &str) -> HttpRequest {
        self.bodiless(HttpMethod::Delete, resource)
    }

    pub fn build_options(&self, resource: &str) -> HttpRequest {
        self.bodiless(HttpMethod::Options, resource)
    }

    pub fn head(self, resource: &str) -> Result<RawResponse, ClientError> {
        let req = self.build_head(resource);
        self.execute(req)
    }

    pub fn get(self, resource: &str) -> Result<RawResponse, ClientError> {
        let req = self.build_get(resource);
        self.execute(req)
    }

    pub fn post(
        self,
        resource: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<RawResponse, ClientError> {
        let req = self.build_post(resource, content_type, content);
        self.execute(req)
    }

    pub fn put(
        self,
        resource: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<RawResponse, ClientError> {
        let req = self.build_put(resource, content_type, content);
        self.execute(req)
    }

    pub fn delete(self, resource: &str) -> Result<RawResponse, ClientError> {
        let req = self.build_delete(resource);
        self.execute(req)
    }

    pub fn options(self, resource: &str) -> Result<RawResponse, ClientError> {
        let req = self.build_options(resource);
        self.execute(req)
    }

    /// Send `request` and read back the whole response, consuming the client.
    pub fn execute(mut self, request: HttpRequest) -> Result<RawResponse, ClientError> {
        debug!("{} {} -> {}", request.method, request.path, self.host());
        self.connection.send(&request.to_bytes())?;
        self.connection.receive(request.method != HttpMethod::Head)
    }

    fn host_header(&self) -> (String, String) {
        ("Host".to_string(), self.host().to_string())
    }

    fn bodiless(&self, method: HttpMethod, resource: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: resource.to_string(),
            headers: vec![self.host_header()],
            body: None,
        }
    }

    fn with_content(
        &self,
        method: HttpMethod,
        resource: &str,
        content_type: &str,
        content: &[u8],
    ) -> HttpRequest {
        HttpRequest {
            method,
            path: resource.to_string(),
            headers: vec![
                self.host_header(),
                ("Content-Type".to_string(), content_type.to_string()),
                ("Content-Length".to_string(), content.len().to_string()),
            ],
            body: Some(content.to_vec()),
        }
    }
}
