//! Status bar
//!
//! Displays the focused pane, the last status message and key hints.

use chatmate_app::Pane;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

fn hints(pane: Pane) -> &'static str {
    match pane {
        Pane::Rooms => "Enter select | n new | r rename | d delete | Tab next | q quit",
        Pane::Chat => "i type | e edit | f refresh | s stop | R reload | Tab next | q quit",
        Pane::Documents => "u upload | m file/link | e edit | d delete | Tab next | q quit",
    }
}

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let pane = match app.focus() {
        Pane::Rooms => "Rooms",
        Pane::Chat => "Chat",
        Pane::Documents => "Documents",
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(pane, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
    ];

    if app.session().is_loading() {
        spans.push(Span::styled("Waiting for reply | ", Style::default().fg(Color::Yellow)));
    }

    match app.status_message() {
        Some(message) if message.starts_with("Error") => {
            spans.push(Span::styled(message.to_string(), Style::default().fg(Color::Red)));
        },
        Some(message) => spans.push(Span::raw(message.to_string())),
        None => spans.push(Span::styled(hints(app.focus()), Style::default().fg(Color::Gray))),
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
