//! Shared helpers for the integration tests.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tcphttp::http::parser::{request_from_reader, ParseError};
use tcphttp::http::request::Request;
use tokio::io::{AsyncRead, ReadBuf};

/// Hands out at most `per_read` bytes per read, like a network connection
/// delivering data in small, arbitrary pieces.
pub struct ChunkReader {
    data: Vec<u8>,
    per_read: usize,
    pos: usize,
}

impl ChunkReader {
    pub fn new(data: impl Into<Vec<u8>>, per_read: usize) -> Self {
        Self {
            data: data.into(),
            per_read,
            pos: 0,
        }
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let start = self.pos;
        let end = (start + self.per_read).min(self.data.len());
        let n = (end - start).min(buf.remaining());

        buf.put_slice(&self.data[start..start + n]);
        self.pos += n;
        Poll::Ready(Ok(()))
    }
}

/// Parses `data` once for every read size from 1 byte up to its full length.
#[allow(dead_code)]
pub async fn parse_every_chunking(data: &str) -> Vec<Result<Request, ParseError>> {
    let mut results = Vec::new();
    for per_read in 1..=data.len() {
        let mut reader = ChunkReader::new(data, per_read);
        results.push(request_from_reader(&mut reader).await);
    }
    results
}

/// Parses `data` delivered in reads of `per_read` bytes.
#[allow(dead_code)]
pub async fn parse_in_chunks(data: &str, per_read: usize) -> Result<Request, ParseError> {
    let mut reader = ChunkReader::new(data, per_read);
    request_from_reader(&mut reader).await
}
