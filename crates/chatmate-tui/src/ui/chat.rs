//! Chat area
//!
//! Displays the messages of the selected room.

use chatmate_app::Pane;
use chatmate_client::{Message, MessageEdit, Role};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};

use super::{cursor_style, pane_block};
use crate::App;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();

    let title = session
        .selected_room()
        .and_then(|id| session.rooms().iter().find(|room| &room.id == id))
        .map_or_else(|| " No Room ".to_string(), |room| format!(" {} ", room.name));
    let block = pane_block(title, app, Pane::Chat);

    if session.selected_room().is_none() {
        let placeholder = ListItem::new(Line::from(Span::styled(
            "No room selected",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(List::new(vec![placeholder]).block(block), area);
        return;
    }

    let edit = session.editing_message();
    let mut items: Vec<ListItem> = session
        .messages()
        .iter()
        .map(|message| ListItem::new(message_line(message, edit)))
        .collect();

    let message_count = items.len();
    if session.is_loading() {
        items.push(ListItem::new(Line::from(Span::styled(
            "<system> ...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))));
    }

    // Follow the cursor while focused, otherwise stick to the newest line.
    let focused = app.focus() == Pane::Chat && message_count > 0;
    let mut list = List::new(items).block(block);
    let mut state = ListState::default();
    if focused {
        list = list.highlight_style(cursor_style());
        state.select(Some(app.message_cursor()));
    } else if message_count > 0 || session.is_loading() {
        let last = if session.is_loading() { message_count } else { message_count - 1 };
        state.select(Some(last));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn role_style(role: Role) -> Style {
    let color = match role {
        Role::User => Color::Green,
        Role::System => Color::Cyan,
        _ => Color::Magenta,
    };
    Style::default().fg(color)
}

/// One chat line: role label, then the content or the edit draft.
fn message_line(message: &Message, edit: Option<&MessageEdit>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("<{}>", message.role.as_str()),
            role_style(message.role).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    match edit.filter(|e| e.query_id == message.id && message.role == Role::User) {
        Some(e) => {
            spans.push(Span::styled(
                e.draft.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
            let marker = if e.saving { " (saving)" } else { " (editing)" };
            spans.push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
        },
        None => spans.push(Span::raw(message.content.clone())),
    }
    Line::from(spans)
}
