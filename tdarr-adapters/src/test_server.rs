//! Minimal one-shot HTTP server for adapter tests.

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A fixed response served to the next connection.
pub(crate) struct CannedResponse {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl CannedResponse {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub(crate) fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }

    pub(crate) fn no_content() -> Self {
        Self::text(204, "")
    }
}

/// Serve a single response. Returns the base URL and a handle yielding the
/// raw request text.
pub(crate) async fn serve_once(response: CannedResponse) -> (String, JoinHandle<String>) {
    let (endpoint, handle) = serve_many(vec![response]).await;
    let handle = tokio::spawn(async move {
        handle
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap_or_default()
    });
    (endpoint, handle)
}

/// Serve one response per connection, in order.
pub(crate) async fn serve_many(
    responses: Vec<CannedResponse>,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            write_response(&mut stream, &response).await;
        }
        requests
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

async fn write_response(stream: &mut TcpStream, response: &CannedResponse) {
    let mut reply = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nConnection: close\r\n",
        response.status, response.content_type
    );
    if response.status != 204 {
        reply.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    }
    reply.push_str("\r\n");
    reply.push_str(&response.body);

    stream.write_all(reply.as_bytes()).await.unwrap();
    let _ = stream.shutdown().await;
}
