mod draw;
mod keys;
mod notify;
mod theme;

use std::{io, path::PathBuf, sync::Arc, time::Duration};

use chrono::{Local, Timelike};
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use crate::{
    backend::{ChatBackend, ChatRequest, ChatResponse},
    history::ExportOutcome,
    navigation::{Navigator, Panel},
    preferences::{PreferenceChange, PreferenceField},
    session::ChatSession,
};

pub use keys::{Shortcut, global_shortcut};
pub use theme::Theme;

const TICK: Duration = Duration::from_millis(400);
const INPUT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Reply(anyhow::Result<ChatResponse>),
    Suggestions(Vec<String>),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    ConfirmClear,
}

/// Everything the terminal front end shows besides the session itself.
pub struct App {
    pub session: ChatSession,
    pub navigator: Navigator,
    pub theme: Theme,
    pub input: String,
    pub input_focused: bool,
    pub personality_cursor: usize,
    pub settings_cursor: usize,
    pub popup: Option<Popup>,
    pub status: Option<String>,
    pub suggestions: Vec<String>,
    pub next_suggestion: usize,
    pub tick: u64,
    pub quit: bool,
    export_dir: PathBuf,
}

impl App {
    pub fn new(session: ChatSession, export_dir: PathBuf) -> Self {
        let theme = Theme::for_preferences(session.preferences());
        Self {
            session,
            navigator: Navigator::default(),
            theme,
            input: String::new(),
            input_focused: true,
            personality_cursor: 0,
            settings_cursor: 0,
            popup: None,
            status: None,
            suggestions: Vec::new(),
            next_suggestion: 0,
            tick: 0,
            quit: false,
            export_dir,
        }
    }

    /// Applies a key press. Returns a chat request when one must be sent.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Option<ChatRequest> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if self.popup == Some(Popup::ConfirmClear) {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.popup = None;
                    self.session.clear_history(Local::now().hour()).await;
                    self.set_status("History cleared!");
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.popup = None,
                _ => {}
            }
            return None;
        }

        if let Some(shortcut) = global_shortcut(&key) {
            self.run_shortcut(shortcut).await;
            return None;
        }

        match self.navigator.active() {
            Panel::Chat => self.handle_chat_key(key),
            Panel::Personality => {
                self.handle_settings_key(key, PreferenceField::PERSONALITY)
                    .await;
                None
            }
            Panel::Settings => {
                self.handle_settings_key(key, PreferenceField::GENERAL).await;
                None
            }
        }
    }

    pub async fn handle_reply(&mut self, result: anyhow::Result<ChatResponse>) -> Option<ChatRequest> {
        let completion = self.session.complete(result).await;
        if completion.notify {
            notify::beep();
        }
        self.sync_save_error();
        completion.next
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
        self.next_suggestion = 0;
    }

    async fn run_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::FocusInput => {
                self.select_panel(Panel::Chat);
                self.input_focused = true;
            }
            Shortcut::ToggleDarkMode => {
                let enabled = !self.session.preferences().dark_mode;
                self.change_preference(PreferenceChange::DarkMode(enabled))
                    .await;
            }
            Shortcut::ClearHistory => self.popup = Some(Popup::ConfirmClear),
            Shortcut::Export => self.export().await,
            Shortcut::NextSuggestion => {
                if let Some(suggestion) = self.suggestions.get(self.next_suggestion) {
                    self.input = suggestion.clone();
                    self.next_suggestion = (self.next_suggestion + 1) % self.suggestions.len();
                    self.select_panel(Panel::Chat);
                    self.input_focused = true;
                }
            }
            Shortcut::NextPanel => {
                let panel = self.navigator.next();
                self.on_panel_selected(panel);
            }
            Shortcut::PrevPanel => {
                let panel = self.navigator.prev();
                self.on_panel_selected(panel);
            }
            Shortcut::SelectPanel(panel) => self.select_panel(panel),
            Shortcut::Quit => self.quit = true,
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) -> Option<ChatRequest> {
        match key.code {
            KeyCode::PageUp => self.session.view_mut().scroll_up(5),
            KeyCode::PageDown => self.session.view_mut().scroll_down(5),
            KeyCode::End => self.session.view_mut().scroll_to_bottom(),
            KeyCode::Esc if self.input_focused => self.input_focused = false,
            KeyCode::Esc => self.quit = true,
            _ if !self.input_focused => {}
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input);
                return self.session.submit(&input);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(character)
                if !key.modifiers.intersects(
                    KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
                ) =>
            {
                self.input.push(character)
            }
            _ => {}
        }
        None
    }

    async fn handle_settings_key(&mut self, key: KeyEvent, fields: &[PreferenceField]) {
        let cursor = match self.navigator.active() {
            Panel::Personality => &mut self.personality_cursor,
            _ => &mut self.settings_cursor,
        };

        let forward = match key.code {
            KeyCode::Up => {
                *cursor = cursor.checked_sub(1).unwrap_or(fields.len() - 1);
                return;
            }
            KeyCode::Down => {
                *cursor = (*cursor + 1) % fields.len();
                return;
            }
            KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => true,
            KeyCode::Left => false,
            KeyCode::Esc => {
                self.quit = true;
                return;
            }
            _ => return,
        };

        let field = fields[(*cursor).min(fields.len() - 1)];
        let change = field.step(self.session.preferences(), forward);
        self.change_preference(change).await;
    }

    async fn change_preference(&mut self, change: PreferenceChange) {
        let effect = self.session.change_preference(change).await;
        if effect.theme_changed {
            self.theme = Theme::for_preferences(self.session.preferences());
        }
        self.sync_save_error();
    }

    async fn export(&mut self) {
        let today = Local::now().date_naive();
        match self.session.export(&self.export_dir, today).await {
            Ok(ExportOutcome::Empty) => self.set_status("No conversations to export!"),
            Ok(ExportOutcome::Written(path)) => {
                self.set_status(format!(
                    "Conversation exported successfully to {}",
                    path.display()
                ));
            }
            Err(error) => {
                warn!(?error, "export failed");
                self.set_status(format!("Export failed: {error}"));
            }
        }
    }

    fn select_panel(&mut self, panel: Panel) {
        self.navigator.select(panel);
        self.on_panel_selected(panel);
    }

    fn on_panel_selected(&mut self, panel: Panel) {
        if panel == Panel::Chat {
            self.session.view_mut().scroll_to_bottom();
        }
    }

    fn sync_save_error(&mut self) {
        if let Some(error) = self.session.take_save_error() {
            self.set_status(format!("Could not save settings: {error}"));
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}

pub async fn run(mut app: App, backend: Arc<dyn ChatBackend>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut app, backend).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    backend: Arc<dyn ChatBackend>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = unbounded_channel();

    let tx_input = tx.clone();
    std::thread::spawn(move || {
        pump_input(|| event::poll(INPUT_POLL), event::read, &tx_input);
    });

    let tx_tick = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK);
        loop {
            interval.tick().await;
            if tx_tick.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    let suggestions_backend = backend.clone();
    let tx_suggestions = tx.clone();
    tokio::spawn(async move {
        match suggestions_backend.suggestions().await {
            Ok(suggestions) => {
                info!(count = suggestions.len(), "loaded suggestions");
                let _ = tx_suggestions.send(AppEvent::Suggestions(suggestions));
            }
            Err(error) => warn!(?error, "failed to load suggestions"),
        }
    });

    terminal.draw(|frame| draw::draw_ui(frame, app))?;

    while let Some(event) = rx.recv().await {
        let mut should_draw = true;

        let pending = match event {
            AppEvent::Input(key) => app.handle_key(key).await,
            AppEvent::Reply(result) => app.handle_reply(result).await,
            AppEvent::Suggestions(suggestions) => {
                app.set_suggestions(suggestions);
                None
            }
            AppEvent::Tick => {
                app.tick = app.tick.wrapping_add(1);
                should_draw = app.session.view().is_typing()
                    && app.session.preferences().animation_enabled;
                None
            }
        };

        if let Some(request) = pending {
            spawn_send(backend.clone(), request, tx.clone());
        }

        if app.quit {
            break;
        }

        if should_draw {
            terminal.draw(|frame| draw::draw_ui(frame, app))?;
        }
    }

    Ok(())
}

/// Forwards key presses until the receiver is gone or the terminal stops
/// answering polls.
fn pump_input(
    mut poll: impl FnMut() -> io::Result<bool>,
    mut read: impl FnMut() -> io::Result<CEvent>,
    tx: &UnboundedSender<AppEvent>,
) {
    loop {
        match poll() {
            Ok(true) => match read() {
                Ok(CEvent::Key(key)) => {
                    if tx.send(AppEvent::Input(key)).is_err() {
                        return;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(?error, "failed to read terminal event; stopping input");
                    return;
                }
            },
            Ok(false) => {}
            Err(error) => {
                warn!(?error, "terminal input poll failed; stopping input");
                return;
            }
        }
    }
}

fn spawn_send(backend: Arc<dyn ChatBackend>, request: ChatRequest, tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = backend.send(request).await;
        let _ = tx.send(AppEvent::Reply(result));
    });
}
