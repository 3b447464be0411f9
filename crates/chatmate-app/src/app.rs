//! Application state machine.
//!
//! This module defines the [`App`] state machine, which wraps the
//! [`Session`] and the [`DocumentManager`] and owns everything that only
//! matters to an interactive front-end: pane focus, list cursors, the field
//! being edited and a transient status line.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Translates key presses into session and document operations.
//! - Routes each completion to the state machine that issued the request.
//! - Leaves a field once the edit it was bound to has settled.

use std::path::PathBuf;

use chatmate_client::{
    Completion, DocumentManager, Owner, Role, Session, SessionAction, SourceMode,
};

use crate::{AppAction, AppEvent, KeyInput, LineEditor};

/// Focusable pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pane {
    /// Room list.
    #[default]
    Rooms,
    /// Messages of the selected room.
    Chat,
    /// Document list and upload form.
    Documents,
}

impl Pane {
    /// Pane that Tab moves focus to.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Rooms => Self::Chat,
            Self::Chat => Self::Documents,
            Self::Documents => Self::Rooms,
        }
    }
}

/// Text field that receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Chat input line.
    Query,
    /// Name of the room to create.
    NewRoom,
    /// Rename draft of the room in rename-mode.
    RoomName,
    /// Draft of the message in edit-mode.
    MessageDraft,
    /// Upload form title.
    UploadTitle,
    /// Upload form file path or link, by mode.
    UploadSource,
    /// Title draft of the document in edit-mode.
    EditTitle,
    /// Replacement file path or link of the document in edit-mode, by mode.
    EditSource,
}

impl Field {
    /// Pane the field is shown in.
    pub fn pane(self) -> Pane {
        match self {
            Self::Query | Self::MessageDraft => Pane::Chat,
            Self::NewRoom | Self::RoomName => Pane::Rooms,
            Self::UploadTitle | Self::UploadSource | Self::EditTitle | Self::EditSource => {
                Pane::Documents
            },
        }
    }
}

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Rooms, messages and their edit-modes.
    session: Session,
    /// Documents, upload form and document edit-mode.
    documents: DocumentManager,
    /// Focused pane.
    focus: Pane,
    /// Field receiving key presses. `None` if keys are commands.
    editing: Option<Field>,
    /// Cursor of the field being edited.
    editor: LineEditor,
    /// Highlighted room.
    room_cursor: usize,
    /// Highlighted message.
    message_cursor: usize,
    /// Highlighted document.
    document_cursor: usize,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an App with empty state.
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    fn with_session(session: Session) -> Self {
        Self {
            session,
            documents: DocumentManager::new(),
            focus: Pane::Rooms,
            editing: None,
            editor: LineEditor::default(),
            room_cursor: 0,
            message_cursor: 0,
            document_cursor: 0,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Fresh App for a reload.
    ///
    /// All client state is discarded. History tokens keep counting up so
    /// refetches still in flight from before the reload are recognized as
    /// stale.
    #[must_use]
    pub fn reloaded(&self) -> Self {
        let mut app = Self::with_session(Session::continuing_from(self.session.last_history_token()));
        app.terminal_size = self.terminal_size;
        app.status_message = Some("Reloaded".into());
        app
    }

    /// Initial requests: room list and document list.
    pub fn mount(&mut self) -> Vec<AppAction> {
        let mut actions: Vec<AppAction> =
            self.session.mount().into_iter().map(session_action).collect();
        actions.extend(self.documents.mount().into_iter().map(AppAction::Dispatch));
        actions.push(AppAction::Render);
        actions
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Completed(completion) => self.handle_completion(completion),
        }
    }

    fn handle_completion(&mut self, completion: Completion) -> Vec<AppAction> {
        let failure = completion.result.as_ref().err().map(ToString::to_string);

        let mut actions: Vec<AppAction> = match completion.request.owner() {
            Owner::Session => {
                self.session.handle_completion(completion).into_iter().map(session_action).collect()
            },
            Owner::Documents => self
                .documents
                .handle_completion(completion)
                .into_iter()
                .map(AppAction::Dispatch)
                .collect(),
        };

        if let Some(message) = failure {
            self.status_message = Some(format!("Error: {message}"));
        }
        self.settle();
        actions.push(AppAction::Render);
        actions
    }

    /// Clamp cursors to their lists and leave a field whose edit has ended.
    fn settle(&mut self) {
        self.room_cursor = clamp(self.room_cursor, self.session.rooms().len());
        self.message_cursor = clamp(self.message_cursor, self.session.messages().len());
        self.document_cursor = clamp(self.document_cursor, self.documents.documents().len());

        let still_open = match self.editing {
            Some(Field::RoomName) => self.session.editing_room().is_some(),
            Some(Field::MessageDraft) => self.session.editing_message().is_some(),
            Some(Field::EditTitle | Field::EditSource) => self.documents.editing().is_some(),
            _ => true,
        };
        if !still_open {
            self.editing = None;
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Interrupt {
            return vec![AppAction::Quit];
        }
        if let Some(field) = self.editing {
            return self.handle_field_key(field, key);
        }

        match key {
            KeyInput::Tab => {
                self.focus = self.focus.next();
                vec![AppAction::Render]
            },
            KeyInput::Up => self.move_cursor(false),
            KeyInput::Down => self.move_cursor(true),
            KeyInput::Enter => match self.focus {
                Pane::Rooms => self.select_room_at_cursor(),
                Pane::Chat => self.start_field(Field::Query),
                Pane::Documents => self.start_field(Field::UploadTitle),
            },
            KeyInput::Esc => {
                self.status_message = None;
                vec![AppAction::Render]
            },
            KeyInput::Char(c) => self.handle_command(c),
            KeyInput::Backspace
            | KeyInput::Delete
            | KeyInput::Left
            | KeyInput::Right
            | KeyInput::Home
            | KeyInput::End
            | KeyInput::Interrupt => vec![],
        }
    }

    /// Single-key commands outside of text fields.
    fn handle_command(&mut self, c: char) -> Vec<AppAction> {
        match (c, self.focus) {
            ('q', _) => vec![AppAction::Quit],
            ('R', _) => self.session.reload().into_iter().map(session_action).collect(),
            ('s', _) => {
                self.session.stop();
                vec![AppAction::Render]
            },
            ('f', _) => self.refresh_messages(),
            ('i', _) => self.start_field(Field::Query),
            ('n', _) => self.start_field(Field::NewRoom),
            ('u', _) => self.start_field(Field::UploadTitle),
            ('m', _) => {
                self.documents.toggle_mode();
                vec![AppAction::Render]
            },
            ('r', Pane::Rooms) => self.rename_room_at_cursor(),
            ('d', Pane::Rooms) => self.delete_room_at_cursor(),
            ('e', Pane::Chat) => self.edit_message_at_cursor(),
            ('e', Pane::Documents) => self.edit_document_at_cursor(),
            ('d', Pane::Documents) => self.delete_document_at_cursor(),
            _ => vec![],
        }
    }

    fn handle_field_key(&mut self, field: Field, key: KeyInput) -> Vec<AppAction> {
        let mut text = self.field_text(field);
        if self.editor.apply(key, &mut text) {
            self.set_field_text(field, text);
            return vec![AppAction::Render];
        }

        match key {
            KeyInput::Enter => self.commit_field(field),
            KeyInput::Esc => self.cancel_field(field),
            KeyInput::Tab => match field {
                Field::UploadTitle => self.start_field(Field::UploadSource),
                Field::UploadSource => self.start_field(Field::UploadTitle),
                Field::EditTitle => self.start_field(Field::EditSource),
                Field::EditSource => self.start_field(Field::EditTitle),
                Field::Query | Field::NewRoom | Field::RoomName | Field::MessageDraft => {
                    self.editing = None;
                    self.focus = self.focus.next();
                    vec![AppAction::Render]
                },
            },
            _ => vec![],
        }
    }

    fn commit_field(&mut self, field: Field) -> Vec<AppAction> {
        let mut actions: Vec<AppAction> = match field {
            Field::Query => self.session.submit().into_iter().map(session_action).collect(),
            Field::NewRoom => {
                let actions = self.session.create_room();
                if actions.is_empty() {
                    self.status_message = Some("Room name is required".into());
                } else {
                    self.editing = None;
                }
                actions.into_iter().map(session_action).collect()
            },
            Field::RoomName => {
                let actions = self.session.save_edited_room();
                if actions.is_empty() {
                    self.status_message = Some("Room name is required".into());
                }
                actions.into_iter().map(session_action).collect()
            },
            Field::MessageDraft => {
                self.session.save_edited_message().into_iter().map(session_action).collect()
            },
            Field::UploadTitle | Field::UploadSource => {
                let requests = self.documents.upload();
                if requests.is_empty() {
                    self.status_message = Some(match self.documents.mode() {
                        SourceMode::File => "Title and file are required".into(),
                        SourceMode::Link => "Title and link are required".into(),
                    });
                } else {
                    self.editing = None;
                }
                requests.into_iter().map(AppAction::Dispatch).collect()
            },
            Field::EditTitle | Field::EditSource => {
                self.documents.save_edit().into_iter().map(AppAction::Dispatch).collect()
            },
        };
        actions.push(AppAction::Render);
        actions
    }

    fn cancel_field(&mut self, field: Field) -> Vec<AppAction> {
        match field {
            Field::RoomName => self.session.cancel_editing_room(),
            Field::MessageDraft => self.session.cancel_editing_message(),
            Field::EditTitle | Field::EditSource => self.documents.cancel_editing(),
            Field::Query | Field::NewRoom | Field::UploadTitle | Field::UploadSource => {},
        }
        self.editing = None;
        vec![AppAction::Render]
    }

    fn start_field(&mut self, field: Field) -> Vec<AppAction> {
        self.focus = field.pane();
        self.editing = Some(field);
        self.editor = LineEditor::at_end(&self.field_text(field));
        vec![AppAction::Render]
    }

    fn move_cursor(&mut self, down: bool) -> Vec<AppAction> {
        let (cursor, len) = match self.focus {
            Pane::Rooms => (&mut self.room_cursor, self.session.rooms().len()),
            Pane::Chat => (&mut self.message_cursor, self.session.messages().len()),
            Pane::Documents => (&mut self.document_cursor, self.documents.documents().len()),
        };
        *cursor = if down { clamp(cursor.saturating_add(1), len) } else { cursor.saturating_sub(1) };
        vec![AppAction::Render]
    }

    fn select_room_at_cursor(&mut self) -> Vec<AppAction> {
        let Some(room_id) = self.session.rooms().get(self.room_cursor).map(|room| room.id.clone())
        else {
            return vec![];
        };

        self.message_cursor = 0;
        let mut actions: Vec<AppAction> =
            self.session.select_room(&room_id).into_iter().map(session_action).collect();
        actions.push(AppAction::Render);
        actions
    }

    fn refresh_messages(&mut self) -> Vec<AppAction> {
        let mut actions: Vec<AppAction> =
            self.session.refresh_messages().into_iter().map(session_action).collect();
        actions.push(AppAction::Render);
        actions
    }

    fn rename_room_at_cursor(&mut self) -> Vec<AppAction> {
        let Some(room) = self.session.rooms().get(self.room_cursor) else {
            return vec![];
        };

        let (room_id, name) = (room.id.clone(), room.name.clone());
        self.session.start_editing_room(room_id, name);
        self.start_field(Field::RoomName)
    }

    fn delete_room_at_cursor(&mut self) -> Vec<AppAction> {
        let Some(room) = self.session.rooms().get(self.room_cursor) else {
            return vec![];
        };

        let room_id = room.id.clone();
        self.session.delete_room(room_id).into_iter().map(session_action).collect()
    }

    fn edit_message_at_cursor(&mut self) -> Vec<AppAction> {
        let Some(message) = self.session.messages().get(self.message_cursor) else {
            return vec![];
        };
        if message.role != Role::User {
            self.status_message = Some("Only your own messages can be edited".into());
            return vec![AppAction::Render];
        }

        let query_id = message.id.clone();
        if self.session.start_editing_message(&query_id) {
            self.start_field(Field::MessageDraft)
        } else {
            vec![]
        }
    }

    fn edit_document_at_cursor(&mut self) -> Vec<AppAction> {
        let Some(document_id) = self.documents.documents().get(self.document_cursor).map(|d| d.id)
        else {
            return vec![];
        };

        if self.documents.start_editing(document_id) {
            self.start_field(Field::EditTitle)
        } else {
            vec![]
        }
    }

    fn delete_document_at_cursor(&mut self) -> Vec<AppAction> {
        let Some(document_id) = self.documents.documents().get(self.document_cursor).map(|d| d.id)
        else {
            return vec![];
        };

        self.documents.delete(document_id).into_iter().map(AppAction::Dispatch).collect()
    }

    /// Current text of a field.
    ///
    /// File fields show the selected path; an unset draft is empty.
    pub fn field_text(&self, field: Field) -> String {
        let mode = self.documents.mode();
        match field {
            Field::Query => self.session.input().to_string(),
            Field::NewRoom => self.session.new_room_name().to_string(),
            Field::RoomName => {
                self.session.editing_room().map(|edit| edit.name.clone()).unwrap_or_default()
            },
            Field::MessageDraft => {
                self.session.editing_message().map(|edit| edit.draft.clone()).unwrap_or_default()
            },
            Field::UploadTitle => self.documents.title().to_string(),
            Field::UploadSource => match mode {
                SourceMode::File => path_text(self.documents.file()),
                SourceMode::Link => self.documents.link().to_string(),
            },
            Field::EditTitle => {
                self.documents.editing().map(|edit| edit.title.clone()).unwrap_or_default()
            },
            Field::EditSource => self.documents.editing().map_or_else(String::new, |edit| match mode {
                SourceMode::File => path_text(edit.file.as_ref()),
                SourceMode::Link => edit.link.clone(),
            }),
        }
    }

    fn set_field_text(&mut self, field: Field, text: String) {
        let mode = self.documents.mode();
        match field {
            Field::Query => self.session.set_input(text),
            Field::NewRoom => self.session.set_new_room_name(text),
            Field::RoomName => self.session.set_editing_room_name(text),
            Field::MessageDraft => self.session.set_editing_message_text(text),
            Field::UploadTitle => self.documents.set_title(text),
            Field::UploadSource => match mode {
                SourceMode::File => self.documents.set_file(text_path(text)),
                SourceMode::Link => self.documents.set_link(text),
            },
            Field::EditTitle => self.documents.set_edit_title(text),
            Field::EditSource => match mode {
                SourceMode::File => self.documents.set_edit_file(text_path(text)),
                SourceMode::Link => self.documents.set_edit_link(text),
            },
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Rooms, messages and edit-modes.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Documents and upload form.
    pub fn documents(&self) -> &DocumentManager {
        &self.documents
    }

    /// Focused pane.
    pub fn focus(&self) -> Pane {
        self.focus
    }

    /// Field receiving key presses. `None` if keys are commands.
    pub fn editing(&self) -> Option<Field> {
        self.editing
    }

    /// Cursor position in the field being edited, in characters.
    pub fn field_cursor(&self) -> usize {
        self.editing.map_or(0, |field| self.editor.cursor(&self.field_text(field)))
    }

    /// Highlighted room index.
    pub fn room_cursor(&self) -> usize {
        self.room_cursor
    }

    /// Highlighted message index.
    pub fn message_cursor(&self) -> usize {
        self.message_cursor
    }

    /// Highlighted document index.
    pub fn document_cursor(&self) -> usize {
        self.document_cursor
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

fn session_action(action: SessionAction) -> AppAction {
    match action {
        SessionAction::Request(request) => AppAction::Dispatch(request),
        SessionAction::Reload => AppAction::Reload,
    }
}

fn clamp(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

fn path_text(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn text_path(text: String) -> Option<PathBuf> {
    (!text.is_empty()).then(|| PathBuf::from(text))
}

#[cfg(test)]
mod tests {
    use chatmate_client::{ApiError, ApiRequest, ApiResponse, QueryId, QueryRecord, Room, RoomId};

    use super::*;

    fn dispatched(actions: &[AppAction]) -> Vec<&ApiRequest> {
        actions
            .iter()
            .filter_map(|action| match action {
                AppAction::Dispatch(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    /// App with two rooms loaded and the first selected.
    fn loaded_app() -> App {
        let mut app = App::new();
        let _ = app.mount();
        let rooms = vec![Room::new(1, "General"), Room::new(2, "Ops")];
        let actions = app.handle(AppEvent::Completed(Completion::ok(
            ApiRequest::ListRooms,
            ApiResponse::Rooms(rooms),
        )));
        for request in dispatched(&actions) {
            let _ = app.handle(AppEvent::Completed(Completion::ok(
                request.clone(),
                ApiResponse::History(vec![]),
            )));
        }
        app
    }

    #[test]
    fn mount_fetches_rooms_and_documents() {
        let mut app = App::new();
        let actions = app.mount();

        assert_eq!(actions, [
            AppAction::Dispatch(ApiRequest::ListRooms),
            AppAction::Dispatch(ApiRequest::ListDocuments),
            AppAction::Render,
        ]);
    }

    #[test]
    fn tab_cycles_panes() {
        let mut app = App::new();
        assert_eq!(app.focus(), Pane::Rooms);

        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        assert_eq!(app.focus(), Pane::Chat);
        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        assert_eq!(app.focus(), Pane::Documents);
        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        assert_eq!(app.focus(), Pane::Rooms);
    }

    #[test]
    fn enter_on_room_selects_it() {
        let mut app = loaded_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Down));

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(app.session().selected_room(), Some(&RoomId::from(2)));
        assert!(matches!(
            dispatched(&actions).as_slice(),
            [ApiRequest::LoadHistory { room_id, .. }] if room_id == &RoomId::from(2)
        ));
    }

    #[test]
    fn typed_query_is_submitted_on_enter() {
        let mut app = loaded_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Char('i')));
        assert_eq!(app.editing(), Some(Field::Query));

        type_text(&mut app, "hi");
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(dispatched(&actions), [&ApiRequest::SubmitQuery {
            room_id: RoomId::from(1),
            query: "hi".into(),
        }]);
        assert!(app.session().is_loading());
    }

    #[test]
    fn command_keys_are_text_while_editing() {
        let mut app = loaded_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Char('i')));

        let actions = app.handle(AppEvent::Key(KeyInput::Char('q')));

        assert_eq!(actions, [AppAction::Render]);
        assert_eq!(app.session().input(), "q");
    }

    #[test]
    fn interrupt_quits_while_editing() {
        let mut app = loaded_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Char('i')));
        type_text(&mut app, "draft");

        let actions = app.handle(AppEvent::Key(KeyInput::Interrupt));

        assert_eq!(actions, [AppAction::Quit]);
        assert_eq!(app.session().input(), "draft");
    }

    #[test]
    fn rename_field_closes_when_rename_settles() {
        let mut app = loaded_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Char('r')));
        assert_eq!(app.editing(), Some(Field::RoomName));
        assert_eq!(app.field_text(Field::RoomName), "General");

        type_text(&mut app, "!");
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));
        let [request] = dispatched(&actions)[..] else { panic!("expected rename") };
        assert_eq!(app.editing(), Some(Field::RoomName));

        let _ = app.handle(AppEvent::Completed(Completion::ok(request.clone(), ApiResponse::Empty)));

        assert_eq!(app.editing(), None);
        assert_eq!(app.session().rooms()[0].name, "General!");
    }

    #[test]
    fn esc_cancels_rename() {
        let mut app = loaded_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Char('r')));

        let _ = app.handle(AppEvent::Key(KeyInput::Esc));

        assert_eq!(app.editing(), None);
        assert!(app.session().editing_room().is_none());
    }

    #[test]
    fn incomplete_upload_reports_status() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::Key(KeyInput::Char('u')));
        type_text(&mut app, "Notes");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(dispatched(&actions).is_empty());
        assert_eq!(app.status_message(), Some("Title and file are required"));
        assert_eq!(app.editing(), Some(Field::UploadTitle));
    }

    #[test]
    fn link_upload_is_dispatched_from_form() {
        let mut app = App::new();
        let _ = app.handle(AppEvent::Key(KeyInput::Char('u')));
        type_text(&mut app, "Spec");
        let _ = app.handle(AppEvent::Key(KeyInput::Esc));
        let _ = app.handle(AppEvent::Key(KeyInput::Char('m')));
        let _ = app.handle(AppEvent::Key(KeyInput::Char('u')));
        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        assert_eq!(app.editing(), Some(Field::UploadSource));
        type_text(&mut app, "https://example.com");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(matches!(dispatched(&actions).as_slice(), [ApiRequest::UploadDocument { .. }]));
        assert_eq!(app.editing(), None);
    }

    #[test]
    fn failed_completion_sets_status() {
        let mut app = App::new();

        let _ = app.handle(AppEvent::Completed(Completion::err(
            ApiRequest::ListRooms,
            ApiError::Transport {
                url: "http://backend/rooms/".into(),
                message: "refused".into(),
            },
        )));

        assert!(app.status_message().is_some_and(|s| s.starts_with("Error:")));
    }

    #[test]
    fn reload_key_requests_reload_and_reloaded_app_is_empty() {
        let mut app = loaded_app();
        let _ = app.handle(AppEvent::Resize(120, 40));

        let actions = app.handle(AppEvent::Key(KeyInput::Char('R')));
        assert_eq!(actions, [AppAction::Reload]);

        let fresh = app.reloaded();
        assert!(fresh.session().rooms().is_empty());
        assert_eq!(fresh.terminal_size(), (120, 40));
        assert!(fresh.session().last_history_token() >= app.session().last_history_token());
    }

    #[test]
    fn system_messages_cannot_be_edited() {
        let mut app = loaded_app();
        let actions = app.handle(AppEvent::Key(KeyInput::Char('f')));
        let [request] = dispatched(&actions)[..] else { panic!("expected refetch") };
        let history = ApiResponse::History(vec![QueryRecord {
            id: QueryId::from(5),
            query_text: "q".into(),
            response_text: "r".into(),
            created_at: None,
        }]);
        let _ = app.handle(AppEvent::Completed(Completion::ok(request.clone(), history)));
        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        let _ = app.handle(AppEvent::Key(KeyInput::Down));

        let _ = app.handle(AppEvent::Key(KeyInput::Char('e')));

        assert_eq!(app.editing(), None);
        assert_eq!(app.status_message(), Some("Only your own messages can be edited"));
    }
}
