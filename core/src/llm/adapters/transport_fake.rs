//! Fake transport for testing
//!
//! Replays scripted replies instead of making HTTP calls and records every
//! request it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::llm::adapters::transport_types::{AdapterError, HttpTransport};

/// Scripted transport reply
#[derive(Debug, Clone, PartialEq)]
pub enum FakeReply {
    /// 200 with the given body
    Body(String),
    /// Non-2xx status (429 maps to a rate-limit error, 401/403 to authentication)
    Status(u16),
    /// Connection-level failure
    NetworkError(String),
}

/// Request captured by [`FakeTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Parsed body (`Null` if the body was not JSON)
    pub body: JsonValue,
}

/// Fake transport for testing (uses fixture strings)
///
/// Replies are consumed in order; the last one repeats once the script runs out.
#[derive(Debug)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<FakeReply>>,
    captured: Mutex<Vec<CapturedRequest>>,
}

impl FakeTransport {
    /// Create fake transport with given response
    pub fn new(response: &str) -> Self {
        Self::with_replies(vec![FakeReply::Body(response.to_string())])
    }

    /// Create fake transport that returns a network error
    pub fn with_error(msg: &str) -> Self {
        Self::with_replies(vec![FakeReply::NetworkError(msg.to_string())])
    }

    /// Create fake transport that answers with a bare status code
    pub fn with_status(status: u16) -> Self {
        Self::with_replies(vec![FakeReply::Status(status)])
    }

    /// Create fake transport from a reply script
    pub fn with_replies(replies: Vec<FakeReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            captured: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order
    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.captured
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self) -> FakeReply {
        let mut replies = match self.replies.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if replies.len() > 1 {
            replies
                .pop_front()
                .unwrap_or_else(|| FakeReply::NetworkError("script exhausted".to_string()))
        } else {
            replies
                .front()
                .cloned()
                .unwrap_or_else(|| FakeReply::NetworkError("script exhausted".to_string()))
        }
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        if let Ok(mut captured) = self.captured.lock() {
            captured.push(CapturedRequest {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: serde_json::from_str(body).unwrap_or(JsonValue::Null),
            });
        }

        match self.next_reply() {
            FakeReply::Body(body) => Ok(body),
            FakeReply::Status(429) => Err(AdapterError::RateLimited { retry_after: None }),
            FakeReply::Status(status @ (401 | 403)) => Err(AdapterError::Authentication(format!(
                "provider rejected credentials (HTTP {})",
                status
            ))),
            FakeReply::Status(status) => Err(AdapterError::Http {
                status,
                message: format!("HTTP {}", status),
            }),
            FakeReply::NetworkError(msg) => Err(AdapterError::Network(msg)),
        }
    }
}
