use async_trait::async_trait;
use study_companion_common::Result;

use crate::types::ChatRequest;

/// Common trait for chat-completion backends
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a chat request and return the assistant text
    async fn chat(&self, request: ChatRequest) -> Result<String>;

    /// Model served by this client
    fn model(&self) -> &str;
}
