use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A closed set of options a settings control cycles through.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn next(self) -> Self {
        let index = Self::ALL.iter().position(|item| *item == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let index = Self::ALL.iter().position(|item| *item == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Creative,
    Formal,
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Friendly => "Friendly & Casual",
            Tone::Professional => "Professional",
            Tone::Creative => "Creative & Playful",
            Tone::Formal => "Formal & Respectful",
        }
    }
}

impl Choice for Tone {
    const ALL: &'static [Self] = &[
        Tone::Friendly,
        Tone::Professional,
        Tone::Creative,
        Tone::Formal,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Tone::Friendly => "friendly",
            Tone::Professional => "professional",
            Tone::Creative => "creative",
            Tone::Formal => "formal",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl Choice for ResponseLength {
    const ALL: &'static [Self] = &[
        ResponseLength::Short,
        ResponseLength::Medium,
        ResponseLength::Long,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ResponseLength::Short => "short",
            ResponseLength::Medium => "medium",
            ResponseLength::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl Choice for KnowledgeLevel {
    const ALL: &'static [Self] = &[
        KnowledgeLevel::Beginner,
        KnowledgeLevel::Intermediate,
        KnowledgeLevel::Expert,
    ];

    fn as_str(self) -> &'static str {
        match self {
            KnowledgeLevel::Beginner => "beginner",
            KnowledgeLevel::Intermediate => "intermediate",
            KnowledgeLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmojiUsage {
    None,
    #[default]
    Some,
    Lots,
}

impl Choice for EmojiUsage {
    const ALL: &'static [Self] = &[EmojiUsage::None, EmojiUsage::Some, EmojiUsage::Lots];

    fn as_str(self) -> &'static str {
        match self {
            EmojiUsage::None => "none",
            EmojiUsage::Some => "some",
            EmojiUsage::Lots => "lots",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub current_tone: Tone,
    pub response_length: ResponseLength,
    pub knowledge_level: KnowledgeLevel,
    pub emoji_usage: EmojiUsage,
    pub dark_mode: bool,
    pub sound_enabled: bool,
    pub auto_save: bool,
    pub animation_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            current_tone: Tone::default(),
            response_length: ResponseLength::default(),
            knowledge_level: KnowledgeLevel::default(),
            emoji_usage: EmojiUsage::default(),
            dark_mode: false,
            sound_enabled: true,
            auto_save: true,
            animation_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: String,
}

impl ConversationEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }

    pub fn bot(content: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            content: content.into(),
            timestamp: timestamp.unwrap_or_else(now_timestamp),
        }
    }
}

/// The whole persisted record: preferences flattened next to the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    #[serde(flatten)]
    pub preferences: Preferences,
    pub conversation_history: Vec<ConversationEntry>,
    pub current_user: String,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            preferences: Preferences::default(),
            conversation_history: Vec::new(),
            current_user: default_user(),
        }
    }
}

pub fn default_user() -> String {
    "User".to_owned()
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ChatRole, ChatState, Choice, ConversationEntry, EmojiUsage, Tone};

    #[test]
    fn serializes_record_with_flattened_camel_case_keys() {
        let mut state = ChatState::default();
        state.conversation_history.push(ConversationEntry {
            role: ChatRole::User,
            content: "hello".to_owned(),
            timestamp: "T".to_owned(),
        });

        let value = serde_json::to_value(&state).expect("state should serialize");
        assert_eq!(value["currentTone"], json!("friendly"));
        assert_eq!(value["responseLength"], json!("medium"));
        assert_eq!(value["emojiUsage"], json!("some"));
        assert_eq!(value["darkMode"], json!(false));
        assert_eq!(value["autoSave"], json!(true));
        assert_eq!(value["currentUser"], json!("User"));
        assert_eq!(
            value["conversationHistory"],
            json!([{ "role": "user", "content": "hello", "timestamp": "T" }])
        );
    }

    #[test]
    fn choices_cycle_in_both_directions() {
        assert_eq!(Tone::Formal.next(), Tone::Friendly);
        assert_eq!(Tone::Friendly.prev(), Tone::Formal);
        assert_eq!(EmojiUsage::None.next(), EmojiUsage::Some);
        assert_eq!(Tone::Creative.as_str(), "creative");
    }

    #[test]
    fn bot_entry_keeps_server_timestamp() {
        let entry = ConversationEntry::bot("hi!", Some("T".to_owned()));
        assert_eq!(entry.timestamp, "T");
        assert_eq!(entry.role.as_str(), "bot");

        let entry = ConversationEntry::bot("hi!", None);
        assert!(entry.timestamp.ends_with('Z'));
    }
}
