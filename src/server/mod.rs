//! Connection server.
//!
//! [`serve`] binds a listener and runs the accept loop as a background task.
//! Every accepted connection gets its own task which parses exactly one
//! request, hands it to the [`Handler`] and closes the connection.
//!
//! ```text
//!   accept loop ──spawn──▶ worker: parse ─▶ handler(writer, request) ─▶ close
//!        │
//!        └────spawn──▶ worker: ...
//! ```
//!
//! Workers share nothing but the handler, so a slow client only ever stalls
//! its own task. [`Server::close`] stops the accept loop and leaves running
//! workers alone.

pub mod connection;
pub mod listener;

use std::future::Future;

use tokio::io::AsyncWrite;

use crate::http::request::Request;
use crate::http::writer::Writer;

pub use listener::{serve, Server};

/// Produces the response for a parsed request.
///
/// The writer is positioned at the status line. Implementations must drive
/// it to a finished response before returning; whatever has been written
/// when the future resolves is all the client gets.
pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        w: &mut Writer<W>,
        req: &Request,
    ) -> impl Future<Output = anyhow::Result<()>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}
