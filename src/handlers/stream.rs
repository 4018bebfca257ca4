use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;

use crate::http::headers::{HeaderError, Headers};
use crate::http::response::{default_headers, StatusCode};
use crate::http::writer::Writer;

pub const SHA256_TRAILER: &str = "X-Content-SHA256";
pub const LENGTH_TRAILER: &str = "X-Content-Length";

/// A chunked response body that digests everything it sends and reports
/// the digest and length as trailers.
pub struct ChunkedBody<'a, W> {
    writer: &'a mut Writer<W>,
    hasher: Sha256,
    len: usize,
}

impl<'a, W> ChunkedBody<'a, W>
where
    W: AsyncWrite + Unpin,
{
    /// Writes the status line and headers announcing chunked framing and
    /// the trailers that will follow.
    pub async fn start(
        writer: &'a mut Writer<W>,
        status: StatusCode,
        content_type: Option<&str>,
    ) -> anyhow::Result<Self> {
        writer.write_status_line(status).await?;
        writer.write_headers(&chunked_headers(content_type)?).await?;

        Ok(Self {
            writer,
            hasher: Sha256::new(),
            len: 0,
        })
    }

    pub async fn send(&mut self, chunk: &[u8]) -> anyhow::Result<()> {
        self.writer.write_chunked_body(chunk).await?;
        self.hasher.update(chunk);
        self.len += chunk.len();
        Ok(())
    }

    /// Ends the body and writes the trailers. Returns the bytes sent.
    pub async fn finish(self) -> anyhow::Result<usize> {
        self.writer.write_chunked_body_end().await?;

        let mut trailers = Headers::new();
        trailers.set(SHA256_TRAILER, &format!("{:x}", self.hasher.finalize()))?;
        trailers.set(LENGTH_TRAILER, &self.len.to_string())?;
        self.writer.write_trailers(&trailers).await?;

        Ok(self.len)
    }
}

fn chunked_headers(content_type: Option<&str>) -> Result<Headers, HeaderError> {
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.overwrite("Transfer-Encoding", "chunked")?;
    if let Some(content_type) = content_type {
        headers.overwrite("Content-Type", content_type)?;
    }
    headers.set("Trailer", SHA256_TRAILER)?;
    headers.set("Trailer", LENGTH_TRAILER)?;
    Ok(headers)
}
