//! Relays a GET for `/httpbin/<path>` to `<upstream_url>/<path>`.

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWrite;
use url::Url;

use crate::config::HandlersConfig;
use crate::handlers::pages;
use crate::handlers::stream::ChunkedBody;
use crate::http::response::StatusCode;
use crate::http::writer::Writer;

pub async fn forward<W>(
    client: &reqwest::Client,
    config: &HandlersConfig,
    path: &str,
    w: &mut Writer<W>,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let url = upstream_url(&config.upstream_url, path)?;
    tracing::info!(%url, "Forwarding request upstream");

    let mut upstream = match client.get(url.clone()).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(%url, error = %e, "Upstream request failed");
            return pages::internal_error(w).await;
        }
    };

    let status = StatusCode::from(upstream.status().as_u16());
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut body = ChunkedBody::start(w, status, content_type.as_deref()).await?;
    loop {
        match upstream.chunk().await {
            Ok(Some(chunk)) => {
                for piece in chunk.chunks(config.chunk_size.max(1)) {
                    body.send(piece).await?;
                }
            }
            Ok(None) => break,
            Err(e) => {
                // headers are already out; end the body with what we have
                tracing::warn!(%url, error = %e, "Upstream body read failed");
                break;
            }
        }
    }

    let sent = body.finish().await?;
    tracing::debug!(%url, bytes = sent, "Upstream response relayed");
    Ok(())
}

/// Appends `path` (everything after `/httpbin`) to the upstream base URL.
///
/// Only the path and query of the base are touched, so the request target
/// can never change the upstream scheme, host or credentials. Any fragment
/// is dropped.
pub fn upstream_url(base: &str, path: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid upstream URL {base:?}"))?;

    let path = path.split_once('#').map_or(path, |(p, _)| p);
    let (path, query) = match path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path, None),
    };

    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_query(query);
    Ok(url)
}

/// The part of `target` to relay, if it addresses the `/httpbin` route.
///
/// `/httpbin` must be a whole path segment: `/httpbinfoo` and
/// `/httpbin.example.com/x` are not relayed.
pub fn relay_path(target: &str) -> Option<&str> {
    let rest = target.strip_prefix("/httpbin")?;
    (rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')).then_some(rest)
}
