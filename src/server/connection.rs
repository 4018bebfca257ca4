use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

use crate::http::parser::request_from_reader;
use crate::http::request::Request;
use crate::http::writer::Writer;
use crate::server::Handler;

/// One accepted client connection, good for exactly one request.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    /// Parses the request, runs the handler and closes the connection.
    ///
    /// A request that fails to parse closes the connection without calling
    /// the handler.
    pub async fn run<H: Handler>(self, handler: &H) -> anyhow::Result<()> {
        let (mut reader, write_half) = self.stream.into_split();

        let request = request_from_reader(&mut reader)
            .await
            .context("HTTP parse error")?;

        tracing::info!(
            peer = %self.peer,
            method = request.method(),
            target = request.target(),
            "Request received"
        );

        let mut writer = Writer::new(BufWriter::new(write_half));
        let result = respond(handler, &mut writer, &request, self.peer).await;

        let mut sink = writer.into_inner();
        // the client may already be gone; nothing left to report
        let _ = sink.shutdown().await;

        result
    }
}

/// Runs the handler and flushes whatever it wrote.
///
/// A handler error is never masked by a failed flush: when both fail the
/// handler error is returned with the flush error attached.
async fn respond<H, W>(
    handler: &H,
    writer: &mut Writer<W>,
    request: &Request,
    peer: SocketAddr,
) -> anyhow::Result<()>
where
    H: Handler,
    W: AsyncWrite + Unpin + Send,
{
    let handled = handler.handle(writer, request).await;
    let flushed = writer.flush().await;

    if !writer.is_complete() {
        tracing::warn!(
            peer = %peer,
            state = %writer.state(),
            "Handler returned before completing the response"
        );
    }

    match (handled, flushed) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(e)) => Err(anyhow::Error::new(e).context("failed to flush response")),
        (Err(e), Ok(())) => Err(e.context("handler failed")),
        (Err(e), Err(flush)) => {
            Err(e.context(format!("handler failed, and flushing the response failed too: {flush}")))
        }
    }
}
