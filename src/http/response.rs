use std::path::PathBuf;
use std::time::SystemTime;

use crate::http::files::{CONTENT_TYPE, FileInfo};
use crate::http::request::Method;

/// Product token sent in the `Server` header.
pub const SERVER_NAME: &str = concat!("warden/", env!("CARGO_PKG_VERSION"));

/// HTTP status codes the server produces.
///
/// - `Ok` (200): File served
/// - `NotFound` (404): No servable file at the path
/// - `MethodNotAllowed` (405): POST
/// - `NotImplemented` (501): Any method other than GET, HEAD and POST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Headers only
    Empty,
    /// In-memory body, used for the generated HTML pages
    Bytes(Vec<u8>),
    /// A file streamed from disk by the writer
    File { path: PathBuf, size: u64 },
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Header fields in the order they are written
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Every response starts out with the `Date`, `Server` and
/// `Connection: close` fields.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hello".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        let headers = vec![
            ("Date".to_string(), httpdate::fmt_http_date(SystemTime::now())),
            ("Server".to_string(), SERVER_NAME.to_string()),
            ("Connection".to_string(), "close".to_string()),
        ];

        Self {
            status,
            headers,
            body: Body::Empty,
        }
    }

    /// Adds a header, replacing an existing one with the same name in place.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets an in-memory response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Body::Bytes(body);
        self
    }

    /// Streams the file at `path` as the response body.
    pub fn file(mut self, path: PathBuf, size: u64) -> Self {
        self.body = Body::File { path, size };
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length header from the body size if not already present.
    /// Header-only responses get none.
    pub fn build(self) -> Response {
        let length = match &self.body {
            Body::Empty => None,
            Body::Bytes(bytes) => Some(bytes.len() as u64),
            Body::File { size, .. } => Some(*size),
        };

        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));

        let mut builder = self;
        if let (Some(length), false) = (length, has_length) {
            builder = builder.header("Content-Length", length.to_string());
        }

        Response {
            status: builder.status,
            headers: builder.headers,
            body: builder.body,
        }
    }
}

impl Response {
    /// 200 for a servable file. With `include_body` unset (HEAD) the headers
    /// still describe the file but nothing is streamed.
    pub fn file(info: &FileInfo, include_body: bool) -> Self {
        let builder = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Length", info.size.to_string())
            .header("Content-Type", CONTENT_TYPE);

        if include_body {
            builder.file(info.path.clone(), info.size).build()
        } else {
            builder.build()
        }
    }

    /// 404 Not Found. The page is left out for HEAD requests.
    pub fn not_found(include_body: bool) -> Self {
        let builder = ResponseBuilder::new(StatusCode::NotFound).header("Content-Type", "text/html");

        if include_body {
            builder
                .body(html_page("404 Not Found", "File not found"))
                .build()
        } else {
            builder.build()
        }
    }

    /// 405 Method Not Allowed.
    pub fn method_not_allowed(method: &Method) -> Self {
        let message = format!("The request method {} is not allowed", escape_html(method.as_str()));
        ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .header("Content-Type", "text/html")
            .body(html_page("405 Method Not Allowed", &message))
            .build()
    }

    /// 501 Not Implemented.
    pub fn not_implemented(method: &Method) -> Self {
        let message = format!(
            "The request method {} is not implemented",
            escape_html(method.as_str())
        );
        ResponseBuilder::new(StatusCode::NotImplemented)
            .header("Content-Type", "text/html")
            .body(html_page("501 Not Implemented", &message))
            .build()
    }

    /// Looks up a header by name, case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

fn html_page(title: &str, message: &str) -> Vec<u8> {
    format!(
        "<html>\r\n<head><title>{title}</title></head>\r\n<body><p>{message}</p></body>\r\n</html>\r\n"
    )
    .into_bytes()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
