//! Input line
//!
//! Displays the field being edited with its cursor, or the chat input when no
//! field is active.

use chatmate_app::Field;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::App;

const PROMPT_WIDTH: u16 = 3; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

fn field_title(field: Field) -> &'static str {
    match field {
        Field::Query => " Message ",
        Field::NewRoom => " New room ",
        Field::RoomName => " Rename room ",
        Field::MessageDraft => " Edit message ",
        Field::UploadTitle => " Upload title ",
        Field::UploadSource => " Upload source ",
        Field::EditTitle => " Document title ",
        Field::EditSource => " Document source ",
    }
}

/// Render the input line.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(field) = app.editing() else {
        let block = Block::default().borders(Borders::ALL).title(" Message (i to type) ");
        let paragraph = Paragraph::new(format!("> {}", app.session().input()))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let block = Block::default().borders(Borders::ALL).title(field_title(field));
    let paragraph = Paragraph::new(format!("> {}", app.field_text(field)))
        .style(Style::default().fg(Color::White))
        .block(block);

    frame.render_widget(paragraph, area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = (app.field_cursor() as u16).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}
