use crate::types::{Choice, EmojiUsage, KnowledgeLevel, Preferences, ResponseLength, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    Tone(Tone),
    ResponseLength(ResponseLength),
    KnowledgeLevel(KnowledgeLevel),
    EmojiUsage(EmojiUsage),
    DarkMode(bool),
    Sound(bool),
    AutoSave(bool),
    Animation(bool),
}

/// What a single applied change invalidates in the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeEffect {
    pub theme_changed: bool,
    pub preview_changed: bool,
}

impl Preferences {
    pub fn apply(&mut self, change: PreferenceChange) -> ChangeEffect {
        let mut effect = ChangeEffect::default();
        match change {
            PreferenceChange::Tone(tone) => {
                self.current_tone = tone;
                effect.preview_changed = true;
            }
            PreferenceChange::ResponseLength(length) => {
                self.response_length = length;
                effect.preview_changed = true;
            }
            PreferenceChange::KnowledgeLevel(level) => {
                self.knowledge_level = level;
                effect.preview_changed = true;
            }
            PreferenceChange::EmojiUsage(emoji) => {
                self.emoji_usage = emoji;
                effect.preview_changed = true;
            }
            PreferenceChange::DarkMode(enabled) => {
                self.dark_mode = enabled;
                effect.theme_changed = true;
            }
            PreferenceChange::Sound(enabled) => self.sound_enabled = enabled,
            PreferenceChange::AutoSave(enabled) => self.auto_save = enabled,
            PreferenceChange::Animation(enabled) => self.animation_enabled = enabled,
        }
        effect
    }

    pub fn preview_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Your bot will respond in: {} tone",
                self.current_tone.label()
            ),
            format!("Response length: {}", self.response_length.as_str()),
            format!("Knowledge level: {}", self.knowledge_level.as_str()),
            format!("Emoji usage: {}", self.emoji_usage.as_str()),
        ]
    }
}

/// One row of a settings panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceField {
    Tone,
    ResponseLength,
    KnowledgeLevel,
    EmojiUsage,
    DarkMode,
    Sound,
    AutoSave,
    Animation,
}

impl PreferenceField {
    pub const PERSONALITY: &'static [PreferenceField] = &[
        PreferenceField::Tone,
        PreferenceField::ResponseLength,
        PreferenceField::KnowledgeLevel,
        PreferenceField::EmojiUsage,
    ];

    pub const GENERAL: &'static [PreferenceField] = &[
        PreferenceField::DarkMode,
        PreferenceField::Sound,
        PreferenceField::AutoSave,
        PreferenceField::Animation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PreferenceField::Tone => "Tone",
            PreferenceField::ResponseLength => "Response length",
            PreferenceField::KnowledgeLevel => "Knowledge level",
            PreferenceField::EmojiUsage => "Emoji usage",
            PreferenceField::DarkMode => "Dark mode",
            PreferenceField::Sound => "Sound notifications",
            PreferenceField::AutoSave => "Auto-save conversations",
            PreferenceField::Animation => "Animations",
        }
    }

    pub fn display_value(self, preferences: &Preferences) -> String {
        match self {
            PreferenceField::Tone => preferences.current_tone.label().to_owned(),
            PreferenceField::ResponseLength => preferences.response_length.as_str().to_owned(),
            PreferenceField::KnowledgeLevel => preferences.knowledge_level.as_str().to_owned(),
            PreferenceField::EmojiUsage => preferences.emoji_usage.as_str().to_owned(),
            PreferenceField::DarkMode => on_off(preferences.dark_mode),
            PreferenceField::Sound => on_off(preferences.sound_enabled),
            PreferenceField::AutoSave => on_off(preferences.auto_save),
            PreferenceField::Animation => on_off(preferences.animation_enabled),
        }
    }

    /// The change produced by stepping this control forward or backward.
    /// Toggles flip regardless of direction.
    pub fn step(self, preferences: &Preferences, forward: bool) -> PreferenceChange {
        fn cycle<T: Choice>(value: T, forward: bool) -> T {
            if forward { value.next() } else { value.prev() }
        }

        match self {
            PreferenceField::Tone => {
                PreferenceChange::Tone(cycle(preferences.current_tone, forward))
            }
            PreferenceField::ResponseLength => {
                PreferenceChange::ResponseLength(cycle(preferences.response_length, forward))
            }
            PreferenceField::KnowledgeLevel => {
                PreferenceChange::KnowledgeLevel(cycle(preferences.knowledge_level, forward))
            }
            PreferenceField::EmojiUsage => {
                PreferenceChange::EmojiUsage(cycle(preferences.emoji_usage, forward))
            }
            PreferenceField::DarkMode => PreferenceChange::DarkMode(!preferences.dark_mode),
            PreferenceField::Sound => PreferenceChange::Sound(!preferences.sound_enabled),
            PreferenceField::AutoSave => PreferenceChange::AutoSave(!preferences.auto_save),
            PreferenceField::Animation => {
                PreferenceChange::Animation(!preferences.animation_enabled)
            }
        }
    }
}

fn on_off(value: bool) -> String {
    let label = if value { "on" } else { "off" };
    label.to_owned()
}

#[cfg(test)]
mod tests {
    use crate::types::{Preferences, ResponseLength, Tone};

    use super::{PreferenceChange, PreferenceField};

    #[test]
    fn personality_change_regenerates_preview() {
        let mut preferences = Preferences::default();
        let effect = preferences.apply(PreferenceChange::Tone(Tone::Creative));

        assert!(effect.preview_changed);
        assert!(!effect.theme_changed);
        assert_eq!(
            preferences.preview_lines()[0],
            "Your bot will respond in: Creative & Playful tone"
        );
    }

    #[test]
    fn dark_mode_change_only_touches_theme() {
        let mut preferences = Preferences::default();
        let effect = preferences.apply(PreferenceChange::DarkMode(true));

        assert!(effect.theme_changed);
        assert!(!effect.preview_changed);
        assert!(preferences.dark_mode);
        assert_eq!(preferences.current_tone, Tone::Friendly);
    }

    #[test]
    fn stepping_controls_cycles_and_toggles() {
        let preferences = Preferences::default();

        assert_eq!(
            PreferenceField::ResponseLength.step(&preferences, true),
            PreferenceChange::ResponseLength(ResponseLength::Long)
        );
        assert_eq!(
            PreferenceField::ResponseLength.step(&preferences, false),
            PreferenceChange::ResponseLength(ResponseLength::Short)
        );
        assert_eq!(
            PreferenceField::Sound.step(&preferences, false),
            PreferenceChange::Sound(false)
        );
    }
}
