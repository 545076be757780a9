mod file;
mod in_memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::types::{ChatState, ConversationEntry, Preferences, default_user};

pub use file::JsonFileStore;
pub use in_memory::InMemoryStateStore;

/// A single keyed blob holding the whole persisted record.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Option<String>>;

    async fn save(&self, blob: &str) -> anyhow::Result<()>;
}

pub async fn load_state(store: &dyn StateStore) -> anyhow::Result<ChatState> {
    match store.load().await? {
        Some(blob) => Ok(decode_state(&blob)),
        None => Ok(ChatState::default()),
    }
}

pub async fn save_state(store: &dyn StateStore, state: &ChatState) -> anyhow::Result<()> {
    let blob = serde_json::to_string(state)?;
    store.save(&blob).await
}

/// Decodes a persisted record, falling back to defaults field by field.
pub fn decode_state(blob: &str) -> ChatState {
    let value = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => {
            warn!(kind = json_kind(&other), "persisted state is not an object; using defaults");
            return ChatState::default();
        }
        Err(error) => {
            warn!(?error, "persisted state is not valid JSON; using defaults");
            return ChatState::default();
        }
    };

    let defaults = Preferences::default();
    let preferences = Preferences {
        current_tone: field(&value, "currentTone", defaults.current_tone),
        response_length: field(&value, "responseLength", defaults.response_length),
        knowledge_level: field(&value, "knowledgeLevel", defaults.knowledge_level),
        emoji_usage: field(&value, "emojiUsage", defaults.emoji_usage),
        dark_mode: field(&value, "darkMode", defaults.dark_mode),
        sound_enabled: field(&value, "soundEnabled", defaults.sound_enabled),
        auto_save: field(&value, "autoSave", defaults.auto_save),
        animation_enabled: field(&value, "animationEnabled", defaults.animation_enabled),
    };

    ChatState {
        preferences,
        conversation_history: history_field(&value),
        current_user: field(&value, "currentUser", default_user()),
    }
}

fn field<T: DeserializeOwned>(value: &Value, key: &str, default: T) -> T {
    let Some(raw) = value.get(key) else {
        warn!(field = key, "persisted state is missing a field; using default");
        return default;
    };
    match serde_json::from_value(raw.clone()) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(field = key, ?error, "persisted field is malformed; using default");
            default
        }
    }
}

fn history_field(value: &Value) -> Vec<ConversationEntry> {
    let Some(raw) = value.get("conversationHistory") else {
        warn!("persisted state has no conversation history; starting empty");
        return Vec::new();
    };
    let Some(items) = raw.as_array() else {
        warn!(kind = json_kind(raw), "conversation history is not an array; starting empty");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value::<ConversationEntry>(item.clone())
                .map_err(|error| warn!(index, ?error, "dropping malformed history entry"))
                .ok()
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::types::{ChatRole, ChatState, ConversationEntry, EmojiUsage, ResponseLength, Tone};

    use super::{InMemoryStateStore, decode_state, load_state, save_state};

    #[test]
    fn malformed_fields_fall_back_individually() {
        let blob = json!({
            "currentTone": "professional",
            "responseLength": "gigantic",
            "emojiUsage": 3,
            "darkMode": true,
            "conversationHistory": [
                { "role": "user", "content": "hello", "timestamp": "T1" },
                { "role": "alien", "content": "??", "timestamp": "T2" },
                { "role": "bot", "content": "hi!", "timestamp": "T3" }
            ]
        })
        .to_string();

        let state = decode_state(&blob);
        assert_eq!(state.preferences.current_tone, Tone::Professional);
        assert_eq!(state.preferences.response_length, ResponseLength::Medium);
        assert_eq!(state.preferences.emoji_usage, EmojiUsage::Some);
        assert!(state.preferences.dark_mode);
        assert!(state.preferences.sound_enabled);
        assert_eq!(state.current_user, "User");
        assert_eq!(state.conversation_history.len(), 2);
        assert_eq!(state.conversation_history[1].role, ChatRole::Bot);
    }

    #[test]
    fn non_json_blob_yields_defaults() {
        assert_eq!(decode_state("{not json"), ChatState::default());
        assert_eq!(decode_state("[1, 2]"), ChatState::default());
    }

    #[tokio::test]
    async fn save_then_load_restores_record() {
        let store = InMemoryStateStore::default();
        let mut state = ChatState::default();
        state.preferences.dark_mode = true;
        state
            .conversation_history
            .push(ConversationEntry::user("hello"));

        save_state(&store, &state).await.expect("save should succeed");
        let loaded = load_state(&store).await.expect("load should succeed");

        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn empty_store_loads_defaults() {
        let store = InMemoryStateStore::default();
        let loaded = load_state(&store).await.expect("load should succeed");
        assert_eq!(loaded, ChatState::default());
    }
}
