use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::navigation::Panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    FocusInput,
    ToggleDarkMode,
    ClearHistory,
    Export,
    NextSuggestion,
    NextPanel,
    PrevPanel,
    SelectPanel(Panel),
    Quit,
}

/// Bindings that apply on every panel. Ctrl and Cmd (super) are interchangeable.
pub fn global_shortcut(key: &KeyEvent) -> Option<Shortcut> {
    let command = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);

    match key.code {
        KeyCode::Char(character) if command => match character.to_ascii_lowercase() {
            'k' => Some(Shortcut::FocusInput),
            'd' => Some(Shortcut::ToggleDarkMode),
            'l' => Some(Shortcut::ClearHistory),
            'e' => Some(Shortcut::Export),
            'n' => Some(Shortcut::NextSuggestion),
            'c' | 'q' => Some(Shortcut::Quit),
            _ => None,
        },
        KeyCode::Tab => Some(Shortcut::NextPanel),
        KeyCode::BackTab => Some(Shortcut::PrevPanel),
        KeyCode::F(1) => Some(Shortcut::SelectPanel(Panel::Chat)),
        KeyCode::F(2) => Some(Shortcut::SelectPanel(Panel::Personality)),
        KeyCode::F(3) => Some(Shortcut::SelectPanel(Panel::Settings)),
        _ => None,
    }
}

pub const HELP: &str = "Enter send · Tab/F1-F3 panels · Ctrl+K input · Ctrl+D dark · Ctrl+L clear · Ctrl+E export · Ctrl+N suggest · Esc quit";

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::navigation::Panel;

    use super::{Shortcut, global_shortcut};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn resolves_modifier_letter_bindings() {
        assert_eq!(
            global_shortcut(&key(KeyCode::Char('k'), KeyModifiers::CONTROL)),
            Some(Shortcut::FocusInput)
        );
        assert_eq!(
            global_shortcut(&key(KeyCode::Char('d'), KeyModifiers::SUPER)),
            Some(Shortcut::ToggleDarkMode)
        );
        assert_eq!(
            global_shortcut(&key(KeyCode::F(2), KeyModifiers::NONE)),
            Some(Shortcut::SelectPanel(Panel::Personality))
        );
    }

    #[test]
    fn plain_letters_are_not_shortcuts() {
        assert_eq!(
            global_shortcut(&key(KeyCode::Char('d'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            global_shortcut(&key(KeyCode::Char('K'), KeyModifiers::SHIFT)),
            None
        );
    }
}
