use ratatui::style::{Color, Modifier, Style};

use crate::types::Preferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub user: Color,
    pub bot: Color,
    pub status: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(248, 249, 252),
            foreground: Color::Rgb(33, 37, 41),
            muted: Color::Rgb(108, 117, 125),
            accent: Color::Rgb(102, 126, 234),
            border: Color::Rgb(173, 181, 189),
            user: Color::Rgb(118, 75, 162),
            bot: Color::Rgb(13, 110, 253),
            status: Color::Rgb(25, 135, 84),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(26, 27, 38),
            foreground: Color::Rgb(224, 226, 235),
            muted: Color::Rgb(128, 132, 150),
            accent: Color::Rgb(138, 160, 255),
            border: Color::Rgb(68, 71, 90),
            user: Color::Rgb(199, 146, 234),
            bot: Color::Rgb(130, 170, 255),
            status: Color::Rgb(158, 206, 106),
        }
    }

    pub fn for_preferences(preferences: &Preferences) -> Self {
        if preferences.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn border(&self, focused: bool) -> Style {
        let color = if focused { self.accent } else { self.border };
        Style::default().fg(color)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}
