use std::fmt;

use crate::http::headers::HeaderTable;

/// HTTP request methods.
///
/// The server only acts on GET, HEAD and POST. Any other token is kept as
/// `Other` so it can be echoed back in a 501 page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    Get,
    /// HEAD - Like GET but without the response body
    Head,
    /// POST - Recognized, always answered with 405
    Post,
    /// Any other method token, upper-cased
    Other(String),
}

/// Represents a parsed HTTP request from a client.
///
/// `body` is `Some` only when the client declared a positive Content-Length,
/// and then holds exactly that many bytes.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request path as sent by the client, not percent-decoded
    pub path: String,
    /// Minor version from the `HTTP/1.x` protocol token
    pub minor_version: u32,
    /// Request headers in the order they were received
    pub headers: HeaderTable,
    /// Request body, absent when no Content-Length was declared
    pub body: Option<Vec<u8>>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    minor_version: u32,
    headers: HeaderTable,
    body: Option<Vec<u8>>,
}

impl Method {
    /// Parses a method token, ignoring case.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::request::Method;
    /// assert_eq!(Method::from_token("get"), Method::Get);
    /// assert_eq!(Method::from_token("Put"), Method::Other("PUT".to_string()));
    /// ```
    pub fn from_token(token: &str) -> Self {
        let upper = token.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            _ => Method::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            minor_version: 0,
            headers: HeaderTable::new(),
            body: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn minor_version(mut self, minor_version: u32) -> Self {
        self.minor_version = minor_version;
        self
    }

    pub fn header(mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.add(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            minor_version: self.minor_version,
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    ///
    /// When the header was sent more than once the last value is returned.
    pub fn header(&self, key: &str) -> Option<&[u8]> {
        self.headers.lookup(key)
    }
}
