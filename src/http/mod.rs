//! HTTP protocol implementation.
//!
//! This module implements a small HTTP/1.0 file server: one request per
//! connection, no keep-alive, no chunked encoding.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`headers`**: Ordered header table with last-write-wins lookup
//! - **`parser`**: Reads a request line, header fields and bounded body from a stream
//! - **`request`**: HTTP request representation
//! - **`files`**: Resolves request paths against the document root
//! - **`router`**: Picks the response for a request
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`connection`**: Drives a single connection through the states below
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse request line, headers, body
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route, stat the file
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send status line, headers, body
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! A parse failure moves straight to `Closed` without writing anything.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warden::http::{connection::Connection, router::Router};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let router = Arc::new(Router::new("/srv/www"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let router = router.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = socket.into_split();
//!             let mut conn = Connection::new(reader, writer, router);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {:#}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod files;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod writer;
