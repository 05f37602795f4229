//! Tests for the fetch client's request building and response parsing

use url::Url;
use warden::client::{build_request, fetch, parse_response};

#[test]
fn test_build_request() {
    let url = Url::parse("http://localhost:8080/docs/index.html").unwrap();
    let request = String::from_utf8(build_request(&url)).unwrap();

    assert_eq!(
        request,
        "GET /docs/index.html HTTP/1.0\r\nHost: localhost:8080\r\n\r\n"
    );
}

#[test]
fn test_build_request_default_port_and_query() {
    let url = Url::parse("http://example.com/search?q=rust").unwrap();
    let request = String::from_utf8(build_request(&url)).unwrap();

    assert!(request.starts_with("GET /search?q=rust HTTP/1.0\r\n"));
    assert!(request.contains("Host: example.com\r\n"));
}

#[test]
fn test_build_request_root_path() {
    let url = Url::parse("http://localhost").unwrap();
    let request = String::from_utf8(build_request(&url)).unwrap();

    assert!(request.starts_with("GET / HTTP/1.0\r\n"));
}

#[test]
fn test_parse_response() {
    let raw = b"HTTP/1.0 200 OK\r\nServer: warden\r\nContent-Length: 5\r\n\r\nhello";
    let response = parse_response(raw).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.reason, "OK");
    assert_eq!(response.headers.lookup("content-length"), Some(&b"5"[..]));
    assert_eq!(response.body, b"hello");
}

#[test]
fn test_parse_response_multi_word_reason() {
    let raw = b"HTTP/1.0 405 Method Not Allowed\r\n\r\n";
    let response = parse_response(raw).unwrap();

    assert_eq!(response.status, 405);
    assert_eq!(response.reason, "Method Not Allowed");
    assert!(response.body.is_empty());
}

#[test]
fn test_parse_response_incomplete_head() {
    assert!(parse_response(b"HTTP/1.0 200 OK\r\nServer: warden\r\n").is_err());
}

#[test]
fn test_parse_response_bad_status_line() {
    assert!(parse_response(b"SMTP 220 ready\r\n\r\n").is_err());
    assert!(parse_response(b"HTTP/1.0 abc OK\r\n\r\n").is_err());
}

#[tokio::test]
async fn test_fetch_rejects_other_schemes() {
    assert!(fetch("https://localhost/").await.is_err());
    assert!(fetch("not a url").await.is_err());
}
