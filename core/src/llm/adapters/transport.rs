//! HTTP transport for LLM adapters
//!
//! Concrete transport selection. Adapters hold a [`Transport`] so tests can
//! swap the network for scripted replies without changing adapter code.

use async_trait::async_trait;

pub use crate::llm::adapters::transport_fake::{CapturedRequest, FakeReply, FakeTransport};
pub use crate::llm::adapters::transport_reqwest::ReqwestTransport;
pub use crate::llm::adapters::transport_types::{AdapterError, HttpTransport};

/// Concrete transport enum
#[derive(Debug)]
pub enum Transport {
    Real(ReqwestTransport),
    Fake(FakeTransport),
}

impl Transport {
    /// Scripted transport, if this is one
    pub fn as_fake(&self) -> Option<&FakeTransport> {
        match self {
            Transport::Fake(t) => Some(t),
            Transport::Real(_) => None,
        }
    }
}

#[async_trait]
impl HttpTransport for Transport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError> {
        match self {
            Transport::Real(t) => t.post_json(url, headers, body).await,
            Transport::Fake(t) => t.post_json(url, headers, body).await,
        }
    }
}
