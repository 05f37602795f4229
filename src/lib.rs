//! Warden - single-request-per-connection HTTP/1.0 file server
//!
//! Core library for request parsing, file responses and connection dispatch.

pub mod client;
pub mod config;
pub mod http;
pub mod privilege;
pub mod server;
