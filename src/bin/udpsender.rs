//! Sends each line typed on stdin as a UDP datagram.

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;

#[derive(Parser)]
#[command(name = "udpsender")]
#[command(about = "Send stdin lines as UDP datagrams", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "localhost:42069")]
    address: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket
        .connect(&cli.address)
        .await
        .with_context(|| format!("failed to resolve {}", cli.address))?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(">");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };
        let message = format!("{line}\n");
        match socket.send(message.as_bytes()).await {
            Ok(_) => tracing::info!("Message sent: {}", line),
            Err(e) => tracing::warn!(error = %e, "Failed to send message"),
        }
    }

    Ok(())
}
