use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite};

use crate::config::HandlersConfig;
use crate::handlers::pages;
use crate::handlers::stream::ChunkedBody;
use crate::http::response::StatusCode;
use crate::http::writer::Writer;

/// Streams the configured video file as a chunked `video/mp4` body.
pub async fn stream_file<W>(config: &HandlersConfig, w: &mut Writer<W>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut file = match File::open(&config.video_path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %config.video_path.display(), error = %e, "Cannot open video");
            return pages::internal_error(w).await;
        }
    };

    let mut body = ChunkedBody::start(w, StatusCode::Ok, Some("video/mp4")).await?;
    let mut buf = vec![0u8; config.chunk_size.max(1)];
    loop {
        match file.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => body.send(&buf[..n]).await?,
            Err(e) => {
                tracing::warn!(path = %config.video_path.display(), error = %e, "Video read failed");
                break;
            }
        }
    }

    let sent = body.finish().await?;
    tracing::debug!(path = %config.video_path.display(), bytes = sent, "Video streamed");
    Ok(())
}
