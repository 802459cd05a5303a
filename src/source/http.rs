//! [`HttpFetch`] over an async `reqwest` client.

use async_trait::async_trait;

use super::HttpFetch;
use crate::error::MirrorResult;

/// Shared HTTP client.  Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// GET `uri`, failing on non-success statuses.
    async fn send(&self, uri: &str) -> MirrorResult<reqwest::Response> {
        Ok(self.client.get(uri).send().await?.error_for_status()?)
    }

    /// Fetch raw bytes, failing on non-success statuses.
    pub async fn get_bytes(&self, uri: &str) -> MirrorResult<Vec<u8>> {
        let bytes = self.send(uri).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn get_text(&self, uri: &str) -> MirrorResult<String> {
        Ok(self.send(uri).await?.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MirrorError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn get_text_returns_body() {
        let uri = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 5\r\nconnection: close\r\n\r\nhello",
        )
        .await;
        assert_eq!(HttpClient::new().get_text(&uri).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn error_status_fails_both_fetches() {
        const NOT_FOUND: &str =
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";
        let client = HttpClient::new();

        let uri = serve_once(NOT_FOUND).await;
        assert!(matches!(client.get_text(&uri).await, Err(MirrorError::Http(_))));

        let uri = serve_once(NOT_FOUND).await;
        assert!(matches!(client.get_bytes(&uri).await, Err(MirrorError::Http(_))));
    }
}
