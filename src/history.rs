use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use tokio::fs;
use tracing::info;

use crate::types::ConversationEntry;

const INTRODUCTION: &str = "I'm your AI assistant. Ask me about Python, JavaScript, machine learning, web development or any other tech topic!";

pub fn greeting(hour: u32) -> String {
    let salutation = if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    };
    format!("{salutation}! 👋 {INTRODUCTION}")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("chatbot-conversations-{}.json", date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Empty,
    Written(PathBuf),
}

pub async fn export_history(
    history: &[ConversationEntry],
    dir: &Path,
    date: NaiveDate,
) -> anyhow::Result<ExportOutcome> {
    if history.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let document = serde_json::to_string_pretty(history)?;
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(export_file_name(date));
    fs::write(&path, document)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), entries = history.len(), "exported conversation history");
    Ok(ExportOutcome::Written(path))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::types::{ChatRole, ConversationEntry};

    use super::{ExportOutcome, export_file_name, export_history, greeting};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("date should be valid")
    }

    #[test]
    fn greeting_follows_time_of_day() {
        assert!(greeting(0).starts_with("Good morning"));
        assert!(greeting(11).starts_with("Good morning"));
        assert!(greeting(12).starts_with("Good afternoon"));
        assert!(greeting(17).starts_with("Good afternoon"));
        assert!(greeting(18).starts_with("Good evening"));
    }

    #[test]
    fn file_name_carries_the_date() {
        assert_eq!(export_file_name(date()), "chatbot-conversations-2026-10-18.json");
    }

    #[tokio::test]
    async fn empty_history_exports_nothing() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let outcome = export_history(&[], dir.path(), date())
            .await
            .expect("export should succeed");

        assert_eq!(outcome, ExportOutcome::Empty);
        assert!(!dir.path().join(export_file_name(date())).exists());
    }

    #[tokio::test]
    async fn exported_array_matches_history_in_order() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let history = vec![
            ConversationEntry {
                role: ChatRole::User,
                content: "hello".into(),
                timestamp: "T1".into(),
            },
            ConversationEntry {
                role: ChatRole::Bot,
                content: "hi!".into(),
                timestamp: "T2".into(),
            },
        ];

        let outcome = export_history(&history, dir.path(), date())
            .await
            .expect("export should succeed");
        let ExportOutcome::Written(path) = outcome else {
            panic!("history should have been written");
        };

        let raw = std::fs::read_to_string(&path).expect("export should be readable");
        assert!(raw.contains("\n  {"), "export should be pretty-printed");
        let parsed: Vec<ConversationEntry> =
            serde_json::from_str(&raw).expect("export should be a JSON array of entries");
        assert_eq!(parsed, history);
    }
}
