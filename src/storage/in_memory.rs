use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StateStore;

#[derive(Debug, Default, Clone)]
pub struct InMemoryStateStore {
    blob: Arc<RwLock<Option<String>>>,
    writes: Arc<AtomicU64>,
}

impl InMemoryStateStore {
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(RwLock::new(Some(blob.into()))),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn snapshot(&self) -> Option<String> {
        self.blob.read().await.clone()
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.blob.read().await.clone())
    }

    async fn save(&self, blob: &str) -> anyhow::Result<()> {
        *self.blob.write().await = Some(blob.to_owned());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
