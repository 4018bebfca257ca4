//! tcphttp - HTTP/1.1 straight off a TCP stream
//!
//! Incremental request parsing, an order-enforcing response writer with
//! chunked bodies and trailers, and a connection-per-task server.

pub mod config;
pub mod handlers;
pub mod http;
pub mod server;
