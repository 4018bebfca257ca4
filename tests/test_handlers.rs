use std::net::SocketAddr;
use std::path::PathBuf;

use tcphttp::config::HandlersConfig;
use tcphttp::handlers::DemoHandler;
use tcphttp::http::parser::request_from_reader;
use tcphttp::http::writer::Writer;
use tcphttp::server::Handler;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn handler(config: HandlersConfig) -> DemoHandler {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    DemoHandler::with_client(config, client)
}

async fn respond(handler: &DemoHandler, target: &str) -> String {
    let raw = format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let req = request_from_reader(&mut raw.as_bytes()).await.unwrap();

    let mut w = Writer::new(Vec::new());
    handler.handle(&mut w, &req).await.unwrap();
    assert!(w.is_complete());
    String::from_utf8(w.into_inner()).unwrap()
}

/// Serves one canned HTTP response to the first connection.
async fn mock_upstream(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_handler_pages() {
    let h = handler(HandlersConfig::default());

    let ok = respond(&h, "/").await;
    assert!(ok.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(ok.contains("content-type: text/html\r\n"));
    assert!(ok.contains("<h1>Success!</h1>"));

    let bad = respond(&h, "/yourproblem").await;
    assert!(bad.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let err = respond(&h, "/myproblem").await;
    assert!(err.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
}

#[tokio::test]
async fn test_handler_proxies_upstream_as_chunks() {
    let addr = mock_upstream(
        "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nContent-Length: 13\r\nConnection: close\r\n\r\n{\"ok\": true}\n",
    )
    .await;
    let h = handler(HandlersConfig {
        upstream_url: format!("http://{addr}"),
        ..HandlersConfig::default()
    });

    let out = respond(&h, "/httpbin/anything").await;

    assert!(out.starts_with("HTTP/1.1 201 \r\n"));
    assert!(out.contains("transfer-encoding: chunked\r\n"));
    assert!(out.contains("content-type: application/json\r\n"));
    assert!(out.contains("trailer: X-Content-SHA256, X-Content-Length\r\n"));
    assert!(!out.contains("content-length"));

    let (_, body) = out.split_once("\r\n\r\n").unwrap();
    assert!(body.starts_with("d\r\n{\"ok\": true}\n\r\n0\r\n"));
    assert!(body.contains("x-content-sha256: "));
    assert!(body.ends_with("x-content-length: 13\r\n\r\n"));
}

#[tokio::test]
async fn test_handler_unreachable_upstream_is_500() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let h = handler(HandlersConfig {
        upstream_url: format!("http://{addr}"),
        ..HandlersConfig::default()
    });

    let out = respond(&h, "/httpbin/get").await;
    assert!(out.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
}

#[tokio::test]
async fn test_handler_streams_video_file() {
    let path = std::env::temp_dir().join(format!("tcphttp-video-{}.mp4", std::process::id()));
    std::fs::write(&path, b"0123456789").unwrap();

    let h = handler(HandlersConfig {
        video_path: path.clone(),
        chunk_size: 4,
        ..HandlersConfig::default()
    });
    let out = respond(&h, "/video").await;
    std::fs::remove_file(&path).unwrap();

    assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(out.contains("content-type: video/mp4\r\n"));

    let (_, body) = out.split_once("\r\n\r\n").unwrap();
    assert!(body.starts_with("4\r\n0123\r\n4\r\n4567\r\n2\r\n89\r\n0\r\n"));
    assert!(body.contains(
        "x-content-sha256: 84d89877f0d4041efb6bf91a16f0248f2fd573e6af05c19f96bedb9f882f7882\r\n"
    ));
    assert!(body.ends_with("x-content-length: 10\r\n\r\n"));
}

#[tokio::test]
async fn test_handler_missing_video_is_500() {
    let h = handler(HandlersConfig {
        video_path: PathBuf::from("/definitely/not/here.mp4"),
        ..HandlersConfig::default()
    });

    let out = respond(&h, "/video").await;
    assert!(out.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
}

#[tokio::test]
async fn test_handler_only_relays_httpbin_segment() {
    let addr = mock_upstream("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n").await;
    let h = handler(HandlersConfig {
        upstream_url: format!("http://{addr}"),
        ..HandlersConfig::default()
    });

    for target in ["/httpbin.evil.com/x", "/httpbin@evil.com/x", "/httpbinfoo"] {
        let out = respond(&h, target).await;
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"), "{target}: {out}");
        assert!(out.contains("<h1>Success!</h1>"), "{target}");
    }
}
