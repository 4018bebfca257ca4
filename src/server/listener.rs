use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

use crate::server::Handler;
use crate::server::connection::Connection;

/// Handle to a running server.
///
/// Dropping the handle stops the accept loop as well.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    accept_loop: JoinHandle<()>,
}

/// Binds `port` on all interfaces and starts accepting in the background.
///
/// Port 0 picks a free port; see [`Server::local_addr`].
pub async fn serve<H: Handler>(port: u16, handler: H) -> anyhow::Result<Server> {
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    let local_addr = listener.local_addr()?;
    info!("Listening on {}", local_addr);

    let (shutdown, stop) = oneshot::channel();
    let accept_loop = tokio::spawn(run(listener, Arc::new(handler), stop));

    Ok(Server {
        local_addr,
        shutdown,
        accept_loop,
    })
}

impl Server {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    ///
    /// Connections already being served run to completion.
    pub async fn close(self) -> anyhow::Result<()> {
        // the loop may already have exited, in which case the receiver is gone
        let _ = self.shutdown.send(());
        self.accept_loop.await.context("accept loop panicked")?;
        Ok(())
    }
}

async fn run<H: Handler>(listener: TcpListener, handler: Arc<H>, mut stop: oneshot::Receiver<()>) {
    loop {
        tokio::select! {
            _ = &mut stop => {
                info!("Accept loop stopped");
                break;
            }

            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };
                tracing::debug!("Accepted connection from {}", peer);

                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    let conn = Connection::new(socket, peer);
                    if let Err(e) = conn.run(handler.as_ref()).await {
                        tracing::error!("Connection error from {}: {:#}", peer, e);
                    }
                });
            }
        }
    }
}
