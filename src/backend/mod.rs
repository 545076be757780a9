mod http;
mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpChatBackend;
pub use mock::MockChatBackend;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub personality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(text.into()),
            timestamp: Some(timestamp.into()),
        }
    }

    pub fn refused() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: ChatRequest) -> anyhow::Result<ChatResponse>;

    async fn health(&self) -> anyhow::Result<()>;

    async fn suggestions(&self) -> anyhow::Result<Vec<String>>;
}
