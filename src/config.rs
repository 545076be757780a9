use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub state_path: PathBuf,
    pub export_dir: PathBuf,
    pub log_path: PathBuf,
    pub request_timeout: Duration,
    pub health_check: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = default_data_dir();

        let api_url = env::var("CHATMATE_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_owned());
        let api_url = api_url.trim().trim_end_matches('/').to_owned();
        if api_url.is_empty() {
            anyhow::bail!("CHATMATE_API_URL must not be empty");
        }

        let export_dir = match env::var("CHATMATE_EXPORT_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir()?,
        };

        Ok(Self {
            api_url,
            state_path: env_path("CHATMATE_STATE_PATH")
                .unwrap_or_else(|| data_dir.join("chatbotSettings.json")),
            export_dir,
            log_path: env_path("CHATMATE_LOG_PATH")
                .unwrap_or_else(|| data_dir.join("chatmate.log")),
            request_timeout: Duration::from_secs(env_u64("CHATMATE_REQUEST_TIMEOUT_SEC", 30)),
            health_check: env_bool("CHATMATE_HEALTH_CHECK", true),
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatmate")
}

fn env_path(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(PathBuf::from)
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|raw| {
            matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
