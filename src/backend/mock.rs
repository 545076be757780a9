use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use super::{ChatBackend, ChatRequest, ChatResponse};

/// Replays scripted outcomes in order and records every request it sees.
/// Once the script runs out it fails like an unreachable service.
#[derive(Debug, Default)]
pub struct MockChatBackend {
    script: Mutex<VecDeque<Result<ChatResponse, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, response: ChatResponse) -> &Self {
        self.lock_script().push_back(Ok(response));
        self
    }

    pub fn push_failure(&self, reason: impl Into<String>) -> &Self {
        self.lock_script().push_back(Err(reason.into()));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<ChatResponse, String>>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn send(&self, request: ChatRequest) -> anyhow::Result<ChatResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        match self.lock_script().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => Err(anyhow::anyhow!("mock chat backend has no scripted reply")),
        }
    }

    async fn health(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn suggestions(&self) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }
}
