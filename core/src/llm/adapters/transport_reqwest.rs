//! Real HTTP transport using reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use tracing::debug;

use crate::llm::adapters::transport_types::{AdapterError, HttpTransport};

/// Longest provider error body kept in an error message
const MAX_ERROR_BODY: usize = 512;

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create transport with default timeout (60s)
    pub fn new() -> Result<Self, AdapterError> {
        Self::with_timeout(60)
    }

    /// Create transport with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, AdapterError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        debug!(
            url,
            timeout_secs = self.timeout.as_secs(),
            body_len = body.len(),
            "POST"
        );

        let mut request = self.client.post(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        let response = request.body(body.to_string()).send().await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string());
            return Err(AdapterError::RateLimited { retry_after });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdapterError::Authentication(format!(
                "provider rejected credentials (HTTP {})",
                status.as_u16()
            )));
        }

        let text = response.text().await?;
        if !status.is_success() {
            let mut message = text;
            if message.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !message.is_char_boundary(cut) {
                    cut -= 1;
                }
                message.truncate(cut);
            }
            return Err(AdapterError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the URL to hit
    async fn serve_once(status_line: &str, extra_headers: &[&str], body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!("HTTP/1.1 {}\r\n", status_line);
        for header in extra_headers {
            response.push_str(header);
            response.push_str("\r\n");
        }
        response.push_str("Content-Type: application/json\r\n");
        response.push_str(&format!("Content-Length: {}\r\n", body.len()));
        response.push_str("Connection: close\r\n\r\n");
        response.push_str(body);

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/chat/completions", addr)
    }

    /// Drain headers and the declared body so the client sees a clean exchange
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }

    async fn post(url: &str) -> Result<String, AdapterError> {
        let transport = ReqwestTransport::with_timeout(5).unwrap();
        transport
            .post_json(url, &[("Authorization", "Bearer sk-test")], r#"{"model":"gpt-4o"}"#)
            .await
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let url = serve_once("200 OK", &[], r#"{"choices":[]}"#).await;
        assert_eq!(post(&url).await.unwrap(), r#"{"choices":[]}"#);
    }

    #[tokio::test]
    async fn test_429_is_rate_limited_with_retry_after() {
        let url = serve_once("429 Too Many Requests", &["Retry-After: 5"], "{}").await;
        match post(&url).await {
            Err(AdapterError::RateLimited { retry_after }) => {
                assert_eq!(retry_after.as_deref(), Some("5"));
            }
            other => panic!("expected rate limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_429_without_header() {
        let url = serve_once("429 Too Many Requests", &[], "{}").await;
        assert!(matches!(
            post(&url).await,
            Err(AdapterError::RateLimited { retry_after: None })
        ));
    }

    #[tokio::test]
    async fn test_401_and_403_are_authentication_errors() {
        for status in ["401 Unauthorized", "403 Forbidden"] {
            let url = serve_once(status, &[], r#"{"error":"bad key"}"#).await;
            match post(&url).await {
                Err(AdapterError::Authentication(message)) => {
                    assert!(message.contains(&status[..3]));
                }
                other => panic!("expected auth error for {}, got {:?}", status, other),
            }
        }
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_and_body() {
        let url = serve_once("503 Service Unavailable", &[], "overloaded").await;
        match post(&url).await {
            Err(AdapterError::Http { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_long_error_body_truncated_on_char_boundary() {
        // 3-byte chars: 512 is not a multiple of 3, so the cut must back off
        let body = "€".repeat(300);
        let url = serve_once("500 Internal Server Error", &[], &body).await;
        match post(&url).await {
            Err(AdapterError::Http { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message.len(), 510);
                assert!(message.chars().all(|c| c == '€'));
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/chat/completions", addr);
        assert!(matches!(post(&url).await, Err(AdapterError::Network(_))));
    }
}
