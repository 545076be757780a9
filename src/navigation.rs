#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Chat,
    Personality,
    Settings,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Chat, Panel::Personality, Panel::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Chat => "Chat",
            Panel::Personality => "Personality",
            Panel::Settings => "Settings",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|panel| *panel == self)
            .unwrap_or(0)
    }
}

/// Which nav tab and which panel are active. They always move together.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    active_tab: Panel,
    active_panel: Panel,
}

impl Navigator {
    pub fn select(&mut self, panel: Panel) {
        self.active_tab = panel;
        self.active_panel = panel;
    }

    pub fn active(&self) -> Panel {
        self.active_panel
    }

    pub fn is_active(&self, panel: Panel) -> bool {
        self.active_tab == panel && self.active_panel == panel
    }

    pub fn next(&mut self) -> Panel {
        let panel = Panel::ALL[(self.active_panel.index() + 1) % Panel::ALL.len()];
        self.select(panel);
        panel
    }

    pub fn prev(&mut self) -> Panel {
        let len = Panel::ALL.len();
        let panel = Panel::ALL[(self.active_panel.index() + len - 1) % len];
        self.select(panel);
        panel
    }
}

#[cfg(test)]
mod tests {
    use super::{Navigator, Panel};

    #[test]
    fn starts_on_chat_and_selects_exactly_one_panel() {
        let mut navigator = Navigator::default();
        assert_eq!(navigator.active(), Panel::Chat);

        navigator.select(Panel::Settings);
        let active = Panel::ALL
            .iter()
            .filter(|panel| navigator.is_active(**panel))
            .collect::<Vec<_>>();
        assert_eq!(active, vec![&Panel::Settings]);
    }

    #[test]
    fn cycles_through_panels() {
        let mut navigator = Navigator::default();
        assert_eq!(navigator.next(), Panel::Personality);
        assert_eq!(navigator.next(), Panel::Settings);
        assert_eq!(navigator.next(), Panel::Chat);
        assert_eq!(navigator.prev(), Panel::Settings);
    }
}
