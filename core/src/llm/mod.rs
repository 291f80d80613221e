//! LLM plumbing
//!
//! Messages, requests and the provider adapters that put them on the wire.

pub mod adapters;
pub mod message;
pub mod request;

pub use message::{validate_messages, Message, Role};
pub use request::{
    CompletionRequest, ResponseFormat, SamplingParams, ToolDefinition, ToolInvocation, ToolRequest,
};
