//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod chat;
mod documents;
mod input;
mod rooms;
mod status;

use chatmate_app::Pane;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

use crate::App;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    input::render(frame, app, *input_area);
    status::render(frame, app, *status_area);
}

/// Render the main area (rooms sidebar + chat + documents).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const ROOM_SIDEBAR_WIDTH: u16 = 24;
    const CHAT_AREA_MIN_WIDTH: u16 = 30;
    const DOCUMENTS_WIDTH: u16 = 36;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(ROOM_SIDEBAR_WIDTH),
            Constraint::Min(CHAT_AREA_MIN_WIDTH),
            Constraint::Length(DOCUMENTS_WIDTH),
        ])
        .split(area);

    let [rooms_area, chat_area, documents_area] = chunks.as_ref() else {
        return;
    };

    rooms::render(frame, app, *rooms_area);
    chat::render(frame, app, *chat_area);
    documents::render(frame, app, *documents_area);
}

/// Bordered block, highlighted when its pane has focus.
fn pane_block(title: String, app: &App, pane: Pane) -> Block<'static> {
    let border_style = if app.focus() == pane {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default().borders(Borders::ALL).border_style(border_style).title(title)
}

/// Style of the cursor row in the focused list.
fn cursor_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}
