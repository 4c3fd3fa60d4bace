//! Incoming HTTP request type.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

/// An incoming HTTP request.
///
/// Built by the server from the hyper request (plus the peer address), or
/// directly via [`Request::new`] when driving a router in tests.
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    remote_addr: SocketAddr,
    params: HashMap<String, String>,
    body: Bytes,
}

impl Request {
    /// Constructs a request by hand — mainly useful for exercising a
    /// [`Router`](crate::Router) without a TCP listener.
    ///
    /// The remote address defaults to `127.0.0.1:0` and the body is empty.
    ///
    /// # Panics
    ///
    /// Panics if `uri` is not a valid URI.
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.parse().expect("invalid request uri"),
            headers: HeaderMap::new(),
            remote_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            params: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Adds a header, builder style.
    ///
    /// # Panics
    ///
    /// Panics if the name or value is not valid per RFC 9110.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::try_from(name).expect("invalid header name");
        let value = HeaderValue::try_from(value).expect("invalid header value");
        self.headers.append(name, value);
        self
    }

    pub(crate) fn from_parts(
        parts: http::request::Parts,
        body: Bytes,
        remote_addr: SocketAddr,
    ) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            remote_addr,
            params: HashMap::new(),
            body,
        }
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Address of the connected peer.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
