use std::fmt;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::http::headers::HeaderTable;
use crate::http::request::{Method, Request};

/// Longest accepted request or header line, terminator included.
pub const MAX_LINE_LENGTH: usize = 8192;

/// Largest request body the server will read.
pub const MAX_BODY_LENGTH: usize = 4096;

const PROTOCOL_PREFIX: &str = "HTTP/1.";

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request line or header field
    Parse,
    /// Unacceptable Content-Length
    Body,
    /// The underlying stream failed or ended early
    Io,
}

/// The piece of the request line that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestLinePart {
    Method,
    Path,
    Protocol,
}

#[derive(Debug)]
pub enum ParseError {
    NoRequestLine,
    InvalidRequestLine { part: RequestLinePart, line: String },
    LineTooLong { limit: usize },
    InvalidUtf8 { line: String },
    InvalidHeader { line: String },
    UnterminatedHeader { line: String },
    HeadersTruncated,
    NegativeContentLength(i64),
    BodyTooLarge { length: i64, limit: usize },
    ShortBody { expected: usize, source: io::Error },
    Io(io::Error),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::NegativeContentLength(_) | ParseError::BodyTooLarge { .. } => {
                ErrorKind::Body
            }
            ParseError::ShortBody { .. } | ParseError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Parse,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoRequestLine => write!(f, "no request line"),
            ParseError::InvalidRequestLine { part, line } => {
                let part = match part {
                    RequestLinePart::Method => "method",
                    RequestLinePart::Path => "path",
                    RequestLinePart::Protocol => "protocol",
                };
                write!(f, "parse error on request line ({part}): {line:?}")
            }
            ParseError::LineTooLong { limit } => {
                write!(f, "line too long (limit {limit} bytes)")
            }
            ParseError::InvalidUtf8 { line } => {
                write!(f, "request line is not valid UTF-8: {line:?}")
            }
            ParseError::InvalidHeader { line } => {
                write!(f, "parse error on request header field: {line:?}")
            }
            ParseError::UnterminatedHeader { line } => {
                write!(f, "unterminated request header field: {line:?}")
            }
            ParseError::HeadersTruncated => {
                write!(f, "connection closed before end of request headers")
            }
            ParseError::NegativeContentLength(length) => {
                write!(f, "negative Content-Length value: {length}")
            }
            ParseError::BodyTooLarge { length, limit } => {
                write!(f, "request body too large: {length} bytes (limit {limit})")
            }
            ParseError::ShortBody { expected, source } => {
                write!(f, "failed to read request body of {expected} bytes: {source}")
            }
            ParseError::Io(e) => write!(f, "failed to read request: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::ShortBody { source, .. } => Some(source),
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

struct Line {
    bytes: Vec<u8>,
    terminated: bool,
}

/// Reads one complete request from `reader`.
///
/// The reader is consumed up to the end of the body (or the end of the
/// headers when there is no body); nothing past that point is touched.
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?.ok_or(ParseError::NoRequestLine)?;
    let text = std::str::from_utf8(&line.bytes).map_err(|_| ParseError::InvalidUtf8 {
        line: lossy(&line.bytes),
    })?;
    let (method, path, minor_version) = parse_request_line(text)?;

    let mut headers = HeaderTable::new();
    loop {
        let line = read_line(reader).await?.ok_or(ParseError::HeadersTruncated)?;

        if line.bytes.is_empty() && line.terminated {
            break;
        }

        let (name, value) = parse_header_line(line)?;
        headers.add(name, value);
    }

    let length = headers
        .lookup("Content-Length")
        .map(parse_long)
        .unwrap_or(0);

    if length < 0 {
        return Err(ParseError::NegativeContentLength(length));
    }

    let body = if length > 0 {
        if length as u64 > MAX_BODY_LENGTH as u64 {
            return Err(ParseError::BodyTooLarge {
                length,
                limit: MAX_BODY_LENGTH,
            });
        }

        let expected = length as usize;
        let mut body = vec![0u8; expected];
        reader
            .read_exact(&mut body)
            .await
            .map_err(|source| ParseError::ShortBody { expected, source })?;
        Some(body)
    } else {
        None
    };

    Ok(Request {
        method,
        path,
        minor_version,
        headers,
        body,
    })
}

/// Reads a single `\n`-terminated line, returning `None` at end of input.
async fn read_line<R>(reader: &mut R) -> Result<Option<Line>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(256);

    // One byte past the limit so an overlong line is detected, not truncated.
    let n = (&mut *reader)
        .take(MAX_LINE_LENGTH as u64 + 1)
        .read_until(b'\n', &mut buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }
    if n > MAX_LINE_LENGTH {
        return Err(ParseError::LineTooLong {
            limit: MAX_LINE_LENGTH,
        });
    }

    let terminated = buf.last() == Some(&b'\n');
    if terminated {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(Some(Line {
        bytes: buf,
        terminated,
    }))
}

fn parse_request_line(line: &str) -> Result<(Method, String, u32), ParseError> {
    let invalid = |part| ParseError::InvalidRequestLine {
        part,
        line: line.to_string(),
    };

    let (method, rest) = line
        .split_once(' ')
        .ok_or_else(|| invalid(RequestLinePart::Method))?;
    let (path, protocol) = rest
        .split_once(' ')
        .ok_or_else(|| invalid(RequestLinePart::Path))?;

    let prefix_matches = protocol
        .get(..PROTOCOL_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(PROTOCOL_PREFIX));
    if !prefix_matches {
        return Err(invalid(RequestLinePart::Protocol));
    }

    let minor_version = parse_minor_version(&protocol[PROTOCOL_PREFIX.len()..]);

    Ok((Method::from_token(method), path.to_string(), minor_version))
}

/// Splits a header line at its first colon. Name and value keep the exact
/// bytes sent, apart from blanks leading the value.
fn parse_header_line(line: Line) -> Result<(Vec<u8>, Vec<u8>), ParseError> {
    let Line { mut bytes, terminated } = line;

    let Some(colon) = bytes.iter().position(|&b| b == b':') else {
        return Err(ParseError::InvalidHeader { line: lossy(&bytes) });
    };
    if !terminated {
        return Err(ParseError::UnterminatedHeader { line: lossy(&bytes) });
    }

    let value_start = bytes[colon + 1..]
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .map_or(bytes.len(), |skip| colon + 1 + skip);
    let value = bytes.split_off(value_start);
    bytes.truncate(colon);

    Ok((bytes, value))
}

/// Printable rendering of raw request bytes for error messages.
fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Leading decimal digits of `s`, or 0 when there are none or they overflow.
fn parse_minor_version(s: &str) -> u32 {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().unwrap_or(0)
}

/// Lenient integer parse in the manner of C `atol`: leading whitespace, an
/// optional sign, then as many digits as are present. Anything else is 0.
pub fn parse_long(value: &[u8]) -> i64 {
    let s = value.trim_ascii_start();
    let (negative, digits) = match s.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, s),
    };

    let magnitude = digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}
