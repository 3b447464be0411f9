//! Observable App state for invariant checking.
//!
//! Snapshots are plain data so invariants can be checked against states that
//! were built by hand as well as states extracted from a running [`App`].

use chatmate_app::{App, Field, Pane};
use chatmate_client::{DocumentId, HistoryToken, QueryId, Role, RoomId};

/// One message as seen by invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    /// Query the message belongs to.
    pub id: QueryId,
    /// Author role.
    pub role: Role,
}

/// Snapshot of everything the standard invariants look at.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    /// Room ids in list order.
    pub rooms: Vec<RoomId>,
    /// Selected room.
    pub selected_room: Option<RoomId>,
    /// Messages of the selected room.
    pub messages: Vec<MessageSnapshot>,
    /// Room in rename-mode.
    pub editing_room: Option<RoomId>,
    /// Query in edit-mode.
    pub editing_message: Option<QueryId>,
    /// Document ids in list order.
    pub documents: Vec<DocumentId>,
    /// Document in edit-mode.
    pub editing_document: Option<DocumentId>,
    /// Highest history token issued.
    pub last_history_token: HistoryToken,
    /// Token of the refetch still awaited.
    pub pending_history: Option<HistoryToken>,
    /// Focused pane.
    pub focus: Pane,
    /// Field receiving key presses.
    pub editing_field: Option<Field>,
    /// Highlighted room.
    pub room_cursor: usize,
    /// Highlighted message.
    pub message_cursor: usize,
    /// Highlighted document.
    pub document_cursor: usize,
}

impl AppSnapshot {
    /// Snapshot with no rooms, messages or documents.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extract the observable state of `app`.
    pub fn from_app(app: &App) -> Self {
        let session = app.session();
        let documents = app.documents();

        Self {
            rooms: session.rooms().iter().map(|room| room.id.clone()).collect(),
            selected_room: session.selected_room().cloned(),
            messages: session
                .messages()
                .iter()
                .map(|message| MessageSnapshot { id: message.id.clone(), role: message.role })
                .collect(),
            editing_room: session.editing_room().map(|edit| edit.room_id.clone()),
            editing_message: session.editing_message().map(|edit| edit.query_id.clone()),
            documents: documents.documents().iter().map(|document| document.id).collect(),
            editing_document: documents.editing().map(|edit| edit.document_id),
            last_history_token: session.last_history_token(),
            pending_history: session.pending_history(),
            focus: app.focus(),
            editing_field: app.editing(),
            room_cursor: app.room_cursor(),
            message_cursor: app.message_cursor(),
            document_cursor: app.document_cursor(),
        }
    }

    /// Set the room list.
    #[must_use]
    pub fn with_rooms(mut self, rooms: impl IntoIterator<Item = RoomId>) -> Self {
        self.rooms = rooms.into_iter().collect();
        self
    }

    /// Set the selected room.
    #[must_use]
    pub fn with_selected(mut self, room_id: RoomId) -> Self {
        self.selected_room = Some(room_id);
        self
    }

    /// Append a user/system message pair for `query_id`.
    #[must_use]
    pub fn with_exchange(mut self, query_id: QueryId) -> Self {
        self.messages.push(MessageSnapshot { id: query_id.clone(), role: Role::User });
        self.messages.push(MessageSnapshot { id: query_id, role: Role::System });
        self
    }
}
