use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use crate::{
    navigation::Panel,
    preferences::PreferenceField,
    types::ChatRole,
    view::{MessageNode, escape_text},
};

use super::{App, Popup, keys::HELP};

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_tabs(frame, chunks[0], app);
    match app.navigator.active() {
        Panel::Chat => draw_chat(frame, chunks[1], app),
        Panel::Personality => draw_personality(frame, chunks[1], app),
        Panel::Settings => draw_settings(frame, chunks[1], app),
    }
    draw_status(frame, chunks[2], app);

    if app.popup == Some(Popup::ConfirmClear) {
        draw_confirm_clear(frame, area, app);
    }
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = Panel::ALL
        .iter()
        .map(|panel| Line::from(panel.title()))
        .collect::<Vec<_>>();
    let selected = Panel::ALL
        .iter()
        .position(|panel| app.navigator.is_active(*panel))
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border(false))
                .title(Span::styled(" chatmate ", app.theme.title())),
        )
        .style(app.theme.base())
        .highlight_style(
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    frame.render_widget(tabs, area);
}

fn draw_chat(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for node in app.session.view().nodes() {
        match node {
            MessageNode::Message { sender, text } => {
                let (name, color) = match sender {
                    ChatRole::User => (
                        escape_text(&app.session.state().current_user),
                        app.theme.user,
                    ),
                    ChatRole::Bot => ("Bot".to_owned(), app.theme.bot),
                };
                lines.push(Line::from(Span::styled(
                    format!("{name}:"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
                for line in text.lines() {
                    lines.push(Line::from(format!("  {line}")));
                }
            }
            MessageNode::Typing => {
                lines.push(Line::from(Span::styled(
                    "Bot:",
                    Style::default()
                        .fg(app.theme.bot)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {}", typing_dots(app)),
                    Style::default().fg(app.theme.muted),
                )));
            }
        }
        lines.push(Line::from(""));
    }

    if app.session.history().is_empty() && !app.suggestions.is_empty() {
        lines.push(Line::from(Span::styled(
            "Try asking (Ctrl+N):",
            Style::default().fg(app.theme.muted),
        )));
        for suggestion in &app.suggestions {
            lines.push(Line::from(Span::styled(
                format!("  • {}", escape_text(suggestion)),
                Style::default().fg(app.theme.muted),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border(!app.input_focused));
    let inner_width = block.inner(chunks[0]).width.max(1);
    let inner_height = block.inner(chunks[0]).height;
    let messages = Paragraph::new(Text::from(lines))
        .style(app.theme.base())
        .wrap(Wrap { trim: false });
    let total = wrapped_height(&messages, inner_width);
    let offset = total
        .saturating_sub(inner_height)
        .saturating_sub(app.session.view().scroll_back());

    let messages = messages.block(block).scroll((offset, 0));
    frame.render_widget(messages, chunks[0]);

    let title = if app.session.is_awaiting_reply() && app.session.queued_len() > 0 {
        format!(" Message ({} queued) ", app.session.queued_len())
    } else {
        " Message ".to_owned()
    };
    let input = Paragraph::new(app.input.as_str())
        .style(app.theme.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border(app.input_focused))
                .title(title),
        );
    frame.render_widget(input, chunks[1]);

    if app.input_focused && app.popup.is_none() {
        let width = u16::try_from(Line::from(app.input.as_str()).width()).unwrap_or(u16::MAX);
        let max_x = chunks[1].x + chunks[1].width.saturating_sub(2);
        frame.set_cursor_position((
            (chunks[1].x + 1).saturating_add(width).min(max_x),
            chunks[1].y + 1,
        ));
    }
}

fn typing_dots(app: &App) -> String {
    if app.session.preferences().animation_enabled {
        let count = (app.tick % 3) as usize + 1;
        format!("typing{}", ".".repeat(count))
    } else {
        "typing...".to_owned()
    }
}

/// Rows the paragraph occupies at `width`, using ratatui's own word wrapping.
/// The paragraph must not carry a block yet.
fn wrapped_height(paragraph: &Paragraph, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX)
}

fn draw_personality(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    draw_fields(
        frame,
        chunks[0],
        app,
        PreferenceField::PERSONALITY,
        app.personality_cursor,
        " Personality ",
    );

    let preview = app
        .session
        .preferences()
        .preview_lines()
        .into_iter()
        .map(Line::from)
        .collect::<Vec<_>>();
    let preview = Paragraph::new(preview)
        .style(app.theme.base())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border(false))
                .title(" Preview "),
        );
    frame.render_widget(preview, chunks[1]);
}

fn draw_settings(frame: &mut Frame, area: Rect, app: &App) {
    draw_fields(
        frame,
        area,
        app,
        PreferenceField::GENERAL,
        app.settings_cursor,
        " Settings ",
    );
}

fn draw_fields(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    fields: &[PreferenceField],
    cursor: usize,
    title: &str,
) {
    let preferences = app.session.preferences();
    let lines = fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let selected = index == cursor;
            let marker = if selected { "› " } else { "  " };
            let label_style = if selected {
                Style::default()
                    .fg(app.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.foreground)
            };
            Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:<26}", field.label()), label_style),
                Span::styled(
                    format!("◂ {} ▸", field.display_value(preferences)),
                    Style::default().fg(app.theme.muted),
                ),
            ])
        })
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(lines).style(app.theme.base()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border(true))
            .title(title.to_owned()),
    );
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match &app.status {
        Some(status) => (status.as_str(), app.theme.status),
        None => (HELP, app.theme.muted),
    };
    let status = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
        .style(app.theme.base());
    frame.render_widget(status, area);
}

fn draw_confirm_clear(frame: &mut Frame, area: Rect, app: &App) {
    let area = centered_rect(50, 25, area);
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(""),
        Line::from("Are you sure you want to clear all conversations?"),
        Line::from(""),
        Line::from(Span::styled(
            "Press y to confirm, n to cancel",
            Style::default().fg(app.theme.muted),
        )),
    ];
    let popup = Paragraph::new(lines)
        .style(app.theme.base())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border(true))
                .title(Span::styled(" Clear history ", app.theme.title())),
        );
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{
        Terminal,
        backend::TestBackend,
        buffer::Buffer,
        text::{Line, Text},
        widgets::{Paragraph, Wrap},
    };
    use serde_json::json;

    use crate::{
        backend::ChatResponse,
        session::ChatSession,
        storage::InMemoryStateStore,
        ui::App,
    };

    use super::{draw_ui, wrapped_height};

    fn rows(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.y..area.y + area.height)
            .map(|y| {
                (area.x..area.x + area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn render(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test terminal should build");
        terminal
            .draw(|frame| draw_ui(frame, app))
            .expect("frame should render");
        rows(terminal.backend().buffer())
    }

    async fn app(store: InMemoryStateStore) -> App {
        let session = ChatSession::open(Arc::new(store), 9).await;
        App::new(session, std::env::temp_dir())
    }

    #[test]
    fn wrapped_height_follows_word_boundaries() {
        let paragraph = Paragraph::new(Text::from(vec![
            Line::from("aaaaaa bbbbbb cccccc dddddd"),
            Line::from("NEWEST"),
        ]))
        .wrap(Wrap { trim: false });

        assert_eq!(wrapped_height(&paragraph, 10), 5);
    }

    #[tokio::test]
    async fn newest_message_stays_visible_after_wrapped_prose() {
        let mut app = app(InMemoryStateStore::default()).await;
        app.session
            .submit("aaaaaa bbbbbb cccccc dddddd eeeeee ffffff gggggg hhhhhh iiiiii jjjjjj");
        app.session
            .complete(Ok(ChatResponse::reply("NEWEST", "T")))
            .await;

        let rows = render(&app, 20, 12);

        assert!(
            rows.iter().any(|row| row.contains("NEWEST")),
            "newest reply should be on screen: {rows:#?}"
        );
    }

    #[tokio::test]
    async fn user_name_and_suggestions_are_escaped() {
        let store = InMemoryStateStore::with_blob(
            json!({ "currentUser": "\u{1b}[31mEve" }).to_string(),
        );
        let mut app = app(store).await;
        app.set_suggestions(vec!["\u{1b}[2Jwipe".to_owned()]);

        let rows = render(&app, 60, 24);
        assert!(rows.iter().any(|row| row.contains("\\u{1b}[2Jwipe")));
        assert!(!rows.iter().any(|row| row.contains('\u{1b}')));

        app.session.submit("hi");

        let rows = render(&app, 60, 24);
        assert!(rows.iter().any(|row| row.contains("\\u{1b}[31mEve:")));
        assert!(!rows.iter().any(|row| row.contains('\u{1b}')));
    }
}
