use std::fmt;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::Headers;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Position of a [`Writer`] in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Trailers,
    Done,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::StatusLine => "status line",
            WriterState::Headers => "headers",
            WriterState::Body => "body",
            WriterState::Trailers => "trailers",
            WriterState::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("write called out of order: expected {expected}, currently at {actual}")]
    OutOfOrder {
        expected: WriterState,
        actual: WriterState,
    },
    #[error("error writing response: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes one HTTP/1.1 response to `sink`, enforcing
/// status line → headers → body → trailers.
///
/// A call made in the wrong state fails with [`WriterError::OutOfOrder`]
/// before anything is written. The state only advances once a write has
/// fully succeeded.
#[derive(Debug)]
pub struct Writer<W> {
    sink: W,
    state: WriterState,
    chunked: bool,
}

impl<W> Writer<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::StatusLine,
            chunked: false,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Whether a full message has been written.
    ///
    /// A chunked body is only complete once the trailer block (possibly
    /// empty) has supplied the final blank line.
    pub fn is_complete(&self) -> bool {
        match self.state {
            WriterState::Done => true,
            WriterState::Trailers => !self.chunked,
            _ => false,
        }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriterError> {
        self.expect(WriterState::StatusLine)?;
        let line = format!("{} {}\r\n", HTTP_VERSION, status);
        self.sink.write_all(line.as_bytes()).await?;
        self.state = WriterState::Headers;
        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriterError> {
        self.expect(WriterState::Headers)?;
        let mut buf = Vec::new();
        headers.encode_into(&mut buf);
        self.sink.write_all(&buf).await?;
        self.state = WriterState::Body;
        Ok(())
    }

    /// Writes a fixed-length body verbatim.
    ///
    /// The caller is responsible for a matching `Content-Length`.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriterError> {
        self.expect(WriterState::Body)?;
        self.sink.write_all(body).await?;
        self.state = WriterState::Trailers;
        Ok(body.len())
    }

    /// Writes one chunk of a chunked body. May be called any number of times.
    ///
    /// An empty slice writes nothing, since a zero-size chunk would end the
    /// body.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, WriterError> {
        self.expect(WriterState::Body)?;
        self.chunked = true;
        if chunk.is_empty() {
            return Ok(0);
        }
        let buf = encode_chunk(chunk);
        self.sink.write_all(&buf).await?;
        Ok(buf.len())
    }

    /// Writes the terminating `0\r\n` chunk.
    ///
    /// The message is not finished until [`write_trailers`](Self::write_trailers)
    /// writes the trailer block and its blank line.
    pub async fn write_chunked_body_end(&mut self) -> Result<usize, WriterError> {
        self.expect(WriterState::Body)?;
        self.chunked = true;
        self.sink.write_all(LAST_CHUNK).await?;
        self.state = WriterState::Trailers;
        Ok(LAST_CHUNK.len())
    }

    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriterError> {
        self.expect(WriterState::Trailers)?;
        let mut buf = Vec::new();
        trailers.encode_into(&mut buf);
        self.sink.write_all(&buf).await?;
        self.state = WriterState::Done;
        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WriterError> {
        self.sink.flush().await?;
        Ok(())
    }

    fn expect(&self, expected: WriterState) -> Result<(), WriterError> {
        if self.state != expected {
            return Err(WriterError::OutOfOrder {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

const LAST_CHUNK: &[u8] = b"0\r\n";

/// `<hex size>\r\n<payload>\r\n`
fn encode_chunk(payload: &[u8]) -> Vec<u8> {
    let size = format!("{:x}\r\n", payload.len());
    let mut buf = Vec::with_capacity(size.len() + payload.len() + 2);
    buf.extend_from_slice(size.as_bytes());
    buf.extend_from_slice(payload);
    buf.extend_from_slice(b"\r\n");
    buf
}
