use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{ChatBackend, ChatRequest, ChatResponse};

#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    suggestions: Vec<String>,
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: ChatRequest) -> anyhow::Result<ChatResponse> {
        debug!(personality = %request.personality, chars = request.message.len(), "chat request start");

        // The service answers errors with a JSON body too, so the status is not checked here.
        // Failures are reported once, by the session that falls back offline.
        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                debug!(?error, "chat request failed");
                error
            })?;

        let status = response.status();
        let reply = response.json::<ChatResponse>().await.map_err(|error| {
            debug!(?error, %status, "failed to deserialize chat response");
            error
        })?;

        info!(%status, success = reply.success, "chat request done");
        Ok(reply)
    }

    async fn health(&self) -> anyhow::Result<()> {
        self.client
            .get(self.endpoint("health"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn suggestions(&self) -> anyhow::Result<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint("suggestions"))
            .send()
            .await?
            .error_for_status()?
            .json::<SuggestionsResponse>()
            .await?;

        Ok(response.suggestions)
    }
}
