//! Shared test utilities.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::{Fetch, TestFetch};
use crate::error::LoadError;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A `TestFetch` that counts how many fetches were made through it.
pub(crate) struct CountingFetch {
    inner: TestFetch,
    count: AtomicUsize,
}

impl CountingFetch {
    pub(crate) fn new(inner: TestFetch) -> Self {
        Self {
            inner,
            count: AtomicUsize::new(0),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetch for CountingFetch {
    async fn fetch(&self, folder: &str, filename: &str) -> Result<Vec<u8>, LoadError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(folder, filename).await
    }
}

/// Serves exactly one HTTP request on a random local port, answering with `status` (e.g.
/// `"200 OK"`) and `body`. Returns the base URL and a handle that yields the raw request head.
pub(crate) async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: text/csv\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{addr}"), handle)
}
