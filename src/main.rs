use std::{
    fs::OpenOptions,
    sync::{Arc, Mutex},
};

use chatmate::{
    backend::{ChatBackend, HttpChatBackend},
    config::AppConfig,
    session::ChatSession,
    storage::{JsonFileStore, StateStore},
    ui::{self, App},
};
use chrono::{Local, Timelike};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing(&config)?;

    let backend: Arc<dyn ChatBackend> = Arc::new(HttpChatBackend::new(
        config.api_url.clone(),
        config.request_timeout,
    )?);
    info!(api_url = %config.api_url, "chat service configured");

    if config.health_check {
        spawn_health_probe(backend.clone());
    }

    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(config.state_path.clone()));
    info!(path = %config.state_path.display(), "using state file");

    let session = ChatSession::open(store, Local::now().hour()).await;
    let app = App::new(session, config.export_dir.clone());

    ui::run(app, backend).await?;
    info!("chatmate exited");
    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .compact()
        .init();
    Ok(())
}

fn spawn_health_probe(backend: Arc<dyn ChatBackend>) {
    tokio::spawn(async move {
        match backend.health().await {
            Ok(()) => info!("chat service is online"),
            Err(error) => warn!(?error, "chat service not reachable; replies will use offline mode"),
        }
    });
}
