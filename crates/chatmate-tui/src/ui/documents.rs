//! Documents pane
//!
//! Displays the document list and the upload or edit form below it.

use chatmate_app::{Field, Pane};
use chatmate_client::SourceMode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::{cursor_style, pane_block};
use crate::App;

const FORM_HEIGHT: u16 = 6;

/// Render the documents pane.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(FORM_HEIGHT)])
        .split(area);

    let [list_area, form_area] = chunks.as_ref() else {
        return;
    };

    render_list(frame, app, *list_area);
    render_form(frame, app, *form_area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let manager = app.documents();
    let block = pane_block(" Documents ".to_string(), app, Pane::Documents);

    if manager.documents().is_empty() {
        let placeholder =
            ListItem::new(Span::styled("No documents", Style::default().fg(Color::DarkGray)));
        frame.render_widget(List::new(vec![placeholder]).block(block), area);
        return;
    }

    let editing = manager.editing().map(|edit| edit.document_id);
    let items: Vec<ListItem> = manager
        .documents()
        .iter()
        .map(|document| {
            let title_style = if editing == Some(document.id) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            ListItem::new(vec![
                Line::from(Span::styled(document.title.clone(), title_style)),
                Line::from(Span::styled(
                    format!("  {}", document.location().unwrap_or("-")),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let mut list = List::new(items).block(block);
    let mut state = ListState::default();
    if app.focus() == Pane::Documents {
        list = list.highlight_style(cursor_style());
        state.select(Some(app.document_cursor()));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let manager = app.documents();
    let source_label = match manager.mode() {
        SourceMode::File => "File",
        SourceMode::Link => "Link",
    };

    let (title, title_field, source_field, busy, error) = if manager.editing().is_some() {
        (
            format!(" Edit document ({source_label}) "),
            Field::EditTitle,
            Field::EditSource,
            manager.is_saving().then_some("Saving..."),
            manager.edit_error(),
        )
    } else {
        (
            format!(" Upload ({source_label}) "),
            Field::UploadTitle,
            Field::UploadSource,
            manager.is_uploading().then_some("Uploading..."),
            manager.upload_error(),
        )
    };

    let field_line = |label: &str, field: Field| {
        let style = if app.editing() == Some(field) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
            Span::styled(app.field_text(field), style),
        ])
    };

    let mut lines = vec![field_line("Title", title_field), field_line(source_label, source_field)];
    if let Some(busy) = busy {
        lines.push(Line::from(Span::styled(busy, Style::default().fg(Color::Yellow))));
    }
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error, Style::default().fg(Color::Red))));
    }

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
