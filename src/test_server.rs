//! One-shot HTTP server for exercising the download paths in tests.

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Builds a complete response with a matching `Content-Length`.
pub fn response(status: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut raw = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    )
    .into_bytes();
    raw.extend_from_slice(body);
    raw
}

/// Announces `declared` bytes but closes the connection after `body`.
pub fn truncated_response(content_type: &str, body: &[u8], declared: usize) -> Vec<u8> {
    let mut raw = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        content_type, declared
    )
    .into_bytes();
    raw.extend_from_slice(body);
    raw
}

/// Serves `raw` to the first connection and returns the base url.
pub async fn serve_once(raw: Vec<u8>) -> String {
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

        socket.write_all(&raw).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{}", addr)
}

/// Client that talks to the local server directly, ignoring proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
