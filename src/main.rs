use std::path::PathBuf;

use clap::Parser;
use tcphttp::config::Config;
use tcphttp::handlers::DemoHandler;
use tcphttp::server;

#[derive(Parser)]
#[command(name = "tcphttp")]
#[command(about = "HTTP/1.1 server built directly on TCP", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.level()?)
        .init();

    let server = server::serve(cfg.server.port, DemoHandler::new(cfg.handlers.clone())).await?;
    tracing::info!("Server started on port {}", server.local_addr().port());

    shutdown_signal().await?;
    server.close().await?;
    tracing::info!("Server gracefully stopped");

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
