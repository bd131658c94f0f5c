// ABOUTME: Defines the LlmClient trait - the abstraction the agent loop
// ABOUTME: uses to talk to any OpenAI-compatible chat-completions provider.

use async_trait::async_trait;

use super::{Request, Response};
use crate::error::LlmError;

/// Trait for LLM client implementations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the transcript and tool definitions, receive text or tool calls.
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError>;
}
