//! Rooms sidebar
//!
//! Displays the room list, the selected room and any rename in progress.

use chatmate_app::Pane;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};

use super::{cursor_style, pane_block};
use crate::App;

const SELECTED_PREFIX: &str = "> ";
const UNSELECTED_PREFIX: &str = "  ";
const RENAME_MARKER: &str = "* ";

/// Render the rooms sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let rename = session.editing_room();

    let items: Vec<ListItem> = session
        .rooms()
        .iter()
        .map(|room| {
            let selected = session.selected_room() == Some(&room.id);
            let prefix = if selected { SELECTED_PREFIX } else { UNSELECTED_PREFIX };
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let line = match rename.filter(|edit| edit.room_id == room.id) {
                Some(edit) => Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(RENAME_MARKER, Style::default().fg(Color::Cyan)),
                    Span::styled(edit.name.clone(), style.add_modifier(Modifier::ITALIC)),
                ]),
                None => Line::from(vec![Span::raw(prefix), Span::styled(room.name.clone(), style)]),
            };
            ListItem::new(line)
        })
        .collect();

    let block = pane_block(format!(" Rooms ({}) ", items.len()), app, Pane::Rooms);
    let mut list = List::new(items).block(block);
    let mut state = ListState::default();
    if app.focus() == Pane::Rooms && !session.rooms().is_empty() {
        list = list.highlight_style(cursor_style());
        state.select(Some(app.room_cursor()));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
