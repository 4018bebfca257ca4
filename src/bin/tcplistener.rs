//! Accepts TCP connections one at a time and logs every line received.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "tcplistener")]
#[command(about = "Print newline-delimited lines sent over TCP", long_about = None)]
struct Cli {
    #[arg(short, long, default_value_t = 42069)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let mut lines = BufReader::new(socket).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => info!("read: {}", line),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(%peer, error = %e, "Read failed");
                    break;
                }
            }
        }
        info!("Connection to {} closed", peer);
    }
}
