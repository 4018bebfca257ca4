//! Demo routes served by the `tcphttp` binary.
//!
//! - `/yourproblem` → 400 page
//! - `/myproblem` → 500 page
//! - `/httpbin/...` → upstream response relayed as a chunked body
//! - `/video` → local file streamed as a chunked body
//! - anything else → 200 page
//!
//! Streamed bodies end with `X-Content-SHA256` and `X-Content-Length`
//! trailers.

pub mod pages;
pub mod proxy;
pub mod stream;
pub mod video;

use tokio::io::AsyncWrite;

use crate::config::HandlersConfig;
use crate::http::request::Request;
use crate::http::writer::Writer;
use crate::server::Handler;

#[derive(Debug, Clone)]
pub struct DemoHandler {
    config: HandlersConfig,
    client: reqwest::Client,
}

impl DemoHandler {
    pub fn new(config: HandlersConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: HandlersConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

impl Handler for DemoHandler {
    async fn handle<W>(&self, w: &mut Writer<W>, req: &Request) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let target = req.target();

        if let Some(path) = proxy::relay_path(target) {
            return proxy::forward(&self.client, &self.config, path, w).await;
        }

        match target {
            "/yourproblem" => pages::bad_request(w).await?,
            "/myproblem" => pages::internal_error(w).await?,
            "/video" => video::stream_file(&self.config, w).await?,
            _ => pages::ok(w).await?,
        }
        Ok(())
    }
}
