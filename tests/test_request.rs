use warden::http::headers::HeaderTable;
use warden::http::request::{Method, Request, RequestBuilder};

#[test]
fn test_header_table_lookup_is_case_insensitive() {
    let mut headers = HeaderTable::new();
    headers.add("Content-Type", "text/plain");

    assert_eq!(headers.lookup("content-type"), Some(&b"text/plain"[..]));
    assert_eq!(headers.lookup("CONTENT-TYPE"), Some(&b"text/plain"[..]));
    assert_eq!(headers.lookup("Content-Length"), None);
}

#[test]
fn test_header_table_last_added_wins() {
    let mut headers = HeaderTable::new();
    headers.add("X", "a");
    headers.add("Y", "other");
    headers.add("x", "b");

    assert_eq!(headers.lookup("X"), Some(&b"b"[..]));
    assert_eq!(headers.len(), 3);
}

#[test]
fn test_header_table_iterates_in_insertion_order() {
    let headers: HeaderTable = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();

    let fields: Vec<_> = headers.iter().collect();
    assert_eq!(
        fields,
        vec![
            (&b"A"[..], &b"1"[..]),
            (&b"B"[..], &b"2"[..]),
            (&b"A"[..], &b"3"[..]),
        ]
    );
}

#[test]
fn test_header_table_empty() {
    let headers = HeaderTable::new();

    assert!(headers.is_empty());
    assert_eq!(headers.lookup("anything"), None);
}

#[test]
fn test_method_from_token_normalizes_case() {
    assert_eq!(Method::from_token("GET"), Method::Get);
    assert_eq!(Method::from_token("get"), Method::Get);
    assert_eq!(Method::from_token("hEaD"), Method::Head);
    assert_eq!(Method::from_token("Post"), Method::Post);
}

#[test]
fn test_method_unknown_tokens_are_kept() {
    let method = Method::from_token("propfind");

    assert_eq!(method, Method::Other("PROPFIND".to_string()));
    assert_eq!(method.as_str(), "PROPFIND");
    assert_eq!(method.to_string(), "PROPFIND");
}

#[test]
fn test_request_header_retrieval() {
    let req = RequestBuilder::new()
        .method(Method::Get)
        .path("/")
        .header("Host", "example.com")
        .header("host", "other.example.com")
        .build()
        .unwrap();

    assert_eq!(req.header("HOST"), Some(&b"other.example.com"[..]));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_builder_defaults() {
    let req = RequestBuilder::new()
        .method(Method::Head)
        .path("/index.html")
        .build()
        .unwrap();

    assert_eq!(req.minor_version, 0);
    assert!(req.headers.is_empty());
    assert!(req.body.is_none());
}

#[test]
fn test_request_builder_requires_method_and_path() {
    assert!(RequestBuilder::new().path("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::Get).build().is_err());
}

#[test]
fn test_request_body_present_but_empty_is_distinct() {
    let req = Request {
        method: Method::Post,
        path: "/".to_string(),
        minor_version: 1,
        headers: HeaderTable::new(),
        body: Some(Vec::new()),
    };

    assert_eq!(req.body, Some(vec![]));
    assert_ne!(req.body, None);
}
