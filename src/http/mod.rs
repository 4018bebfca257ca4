//! HTTP/1.1 message framing.
//!
//! - **`headers`**: case-insensitive header collection and header line parsing
//! - **`request`**: the parsed request types
//! - **`parser`**: incremental request parser driven by an async byte source
//! - **`response`**: status codes and default response headers
//! - **`writer`**: response writer enforcing the write order, with chunked
//!   bodies and trailers
//!
//! # Request parsing
//!
//! ```text
//!   Initialized ──request line──▶ ParsingHeaders ──blank line──▶ Done
//!                                        │                        ▲
//!                                        │ Content-Length > 0     │
//!                                        ▼                        │
//!                                   ParsingBody ──all bytes read──┘
//! ```
//!
//! # Response writing
//!
//! ```text
//!   StatusLine ─▶ Headers ─▶ Body ─▶ Trailers ─▶ Done
//!                            │  ▲
//!                            └──┘ write_chunked_body
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tcphttp::http::parser::request_from_reader;
//! use tcphttp::http::response::{default_headers, StatusCode};
//! use tcphttp::http::writer::Writer;
//!
//! let (mut rd, wr) = stream.into_split();
//! let req = request_from_reader(&mut rd).await?;
//!
//! let mut w = Writer::new(wr);
//! w.write_status_line(StatusCode::Ok).await?;
//! w.write_headers(&default_headers(2)).await?;
//! w.write_body(b"ok").await?;
//! ```

pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
