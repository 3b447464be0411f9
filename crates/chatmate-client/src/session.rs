//! Session state machine.
//!
//! The `Session` is the single owner of the visible conversation: the room
//! list, the selected room, its messages, the input line and both edit modes.
//! Every state-changing operation either mutates local drafts or returns the
//! requests to perform; server-derived state changes only when the matching
//! [`Completion`] is fed back.
//!
//! # Invariants
//!
//! - At most one room is selected, and it is always a member of the room list.
//! - At most one room is in rename-mode and at most one message in edit-mode.
//! - `messages` belongs to the selected room. Selecting a room clears it before
//!   any request is issued.
//! - Only the latest history refetch may replace `messages`; completions for
//!   older tokens are dropped.

use chatmate_proto::{Message, QueryId, Role, Room, RoomId, flatten_history};

use crate::{ApiError, ApiRequest, ApiResponse, Completion, HistoryToken};

/// Actions the session produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Perform a request and feed its outcome back through
    /// [`Session::handle_completion`].
    Request(ApiRequest),

    /// Discard all client state and mount again.
    Reload,
}

/// A room in rename-mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEdit {
    /// Room being renamed.
    pub room_id: RoomId,
    /// Draft name.
    pub name: String,
    /// A rename request is in flight.
    pub saving: bool,
}

/// A user message in edit-mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEdit {
    /// Query whose user text is being edited.
    pub query_id: QueryId,
    /// Draft text.
    pub draft: String,
    /// An edit request is in flight.
    pub saving: bool,
}

/// Conversation and room state synchronized with the backend.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// All rooms, in server order plus local appends.
    rooms: Vec<Room>,
    /// Messages of the selected room.
    messages: Vec<Message>,
    /// Currently selected room. `None` if no room is selected.
    selected_room: Option<RoomId>,
    /// Chat input line.
    input: String,
    /// Draft name for the next room to create.
    new_room_name: String,
    /// A query submission is in flight and has not been stopped.
    is_loading: bool,
    /// Room in rename-mode.
    editing_room: Option<RoomEdit>,
    /// Message in edit-mode.
    editing_message: Option<MessageEdit>,
    /// Last history token issued.
    last_token: HistoryToken,
    /// Token of the history refetch still awaited.
    pending_history: Option<HistoryToken>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session whose history tokens continue after `last`.
    ///
    /// Refetches issued before a reload then never match a token of the new
    /// session.
    pub fn continuing_from(last: HistoryToken) -> Self {
        Self { last_token: last, ..Self::default() }
    }

    /// Initial fetch of the room list.
    pub fn mount(&self) -> Vec<SessionAction> {
        vec![SessionAction::Request(ApiRequest::ListRooms)]
    }

    /// Select a room, clear its messages and refetch its history.
    ///
    /// Unknown rooms are ignored.
    pub fn select_room(&mut self, room_id: &RoomId) -> Vec<SessionAction> {
        if !self.rooms.iter().any(|room| &room.id == room_id) {
            return vec![];
        }

        self.selected_room = Some(room_id.clone());
        self.messages.clear();
        self.editing_message = None;
        self.request_history()
    }

    /// Refetch the selected room's history, replacing messages when it
    /// arrives.
    pub fn refresh_messages(&mut self) -> Vec<SessionAction> {
        self.request_history()
    }

    /// Submit the input line to the selected room.
    ///
    /// No-op if the input is blank or no room is selected.
    pub fn submit(&mut self) -> Vec<SessionAction> {
        if self.input.trim().is_empty() {
            return vec![];
        }
        let Some(room_id) = self.selected_room.clone() else {
            tracing::warn!("no room selected, query not submitted");
            return vec![];
        };

        self.is_loading = true;
        vec![SessionAction::Request(ApiRequest::SubmitQuery { room_id, query: self.input.clone() })]
    }

    /// Create a room named after the new-room draft.
    ///
    /// No-op if the draft is blank.
    pub fn create_room(&self) -> Vec<SessionAction> {
        if self.new_room_name.trim().is_empty() {
            return vec![];
        }
        vec![SessionAction::Request(ApiRequest::CreateRoom { name: self.new_room_name.clone() })]
    }

    /// Put a room into rename-mode with an initial draft.
    ///
    /// Replaces any rename already in progress.
    pub fn start_editing_room(&mut self, room_id: RoomId, name: impl Into<String>) {
        self.editing_room = Some(RoomEdit { room_id, name: name.into(), saving: false });
    }

    /// Leave rename-mode without saving.
    pub fn cancel_editing_room(&mut self) {
        self.editing_room = None;
    }

    /// Replace the rename draft.
    pub fn set_editing_room_name(&mut self, name: impl Into<String>) {
        if let Some(edit) = self.editing_room.as_mut() {
            edit.name = name.into();
        }
    }

    /// Save the rename draft.
    ///
    /// No-op unless a rename is in progress, not already saving, and the
    /// draft is non-blank. Rename-mode ends when the request settles.
    pub fn save_edited_room(&mut self) -> Vec<SessionAction> {
        let Some(edit) = self.editing_room.as_mut() else {
            return vec![];
        };
        if edit.saving || edit.name.trim().is_empty() {
            return vec![];
        }

        edit.saving = true;
        let (room_id, name) = (edit.room_id.clone(), edit.name.clone());
        self.rename_room(room_id, name)
    }

    /// Rename a room. The local list changes only after the server confirms.
    pub fn rename_room(&self, room_id: RoomId, name: String) -> Vec<SessionAction> {
        vec![SessionAction::Request(ApiRequest::RenameRoom { room_id, name })]
    }

    /// Delete a room. The local list changes only after the server confirms.
    pub fn delete_room(&self, room_id: RoomId) -> Vec<SessionAction> {
        vec![SessionAction::Request(ApiRequest::DeleteRoom { room_id })]
    }

    /// Put a user message into edit-mode, seeded with its current text.
    ///
    /// Returns `false` if no user message with that id is displayed.
    pub fn start_editing_message(&mut self, query_id: &QueryId) -> bool {
        let Some(message) =
            self.messages.iter().find(|m| m.role == Role::User && &m.id == query_id)
        else {
            return false;
        };

        self.editing_message = Some(MessageEdit {
            query_id: query_id.clone(),
            draft: message.content.clone(),
            saving: false,
        });
        true
    }

    /// Replace the message edit draft.
    pub fn set_editing_message_text(&mut self, draft: impl Into<String>) {
        if let Some(edit) = self.editing_message.as_mut() {
            edit.draft = draft.into();
        }
    }

    /// Leave message edit-mode without saving.
    pub fn cancel_editing_message(&mut self) {
        self.editing_message = None;
    }

    /// Save the message edit draft.
    ///
    /// On success the selected room's messages are refetched.
    pub fn save_edited_message(&mut self) -> Vec<SessionAction> {
        let Some(room_id) = self.selected_room.clone() else {
            return vec![];
        };
        let Some(edit) = self.editing_message.as_mut() else {
            return vec![];
        };
        if edit.saving || edit.draft.trim().is_empty() {
            return vec![];
        }

        edit.saving = true;
        vec![SessionAction::Request(ApiRequest::EditQuery {
            room_id,
            query_id: edit.query_id.clone(),
            query: edit.draft.clone(),
        })]
    }

    /// Discard all client state and start over.
    pub fn reload(&self) -> Vec<SessionAction> {
        vec![SessionAction::Reload]
    }

    /// Hide the loading indicator. The in-flight request is not cancelled and
    /// its result is still applied.
    pub fn stop(&mut self) {
        self.is_loading = false;
    }

    /// Replace the input line.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Replace the new-room draft.
    pub fn set_new_room_name(&mut self, name: impl Into<String>) {
        self.new_room_name = name.into();
    }

    /// Apply the outcome of a request this session issued.
    pub fn handle_completion(&mut self, completion: Completion) -> Vec<SessionAction> {
        let Completion { request, result } = completion;

        match request {
            ApiRequest::ListRooms => self.on_rooms_listed(result),
            ApiRequest::CreateRoom { .. } => {
                self.on_room_created(result);
                vec![]
            },
            ApiRequest::RenameRoom { room_id, name } => {
                self.on_room_renamed(&room_id, name, result);
                vec![]
            },
            ApiRequest::DeleteRoom { room_id } => self.on_room_deleted(&room_id, result),
            ApiRequest::LoadHistory { room_id, token } => {
                self.on_history_loaded(&room_id, token, result);
                vec![]
            },
            ApiRequest::SubmitQuery { room_id, .. } => self.on_query_submitted(&room_id, result),
            ApiRequest::EditQuery { room_id, query_id, .. } => {
                self.on_query_edited(&room_id, &query_id, result)
            },
            other @ (ApiRequest::ListDocuments
            | ApiRequest::UploadDocument { .. }
            | ApiRequest::UpdateDocument { .. }
            | ApiRequest::DeleteDocument { .. }) => {
                tracing::warn!(request = ?other, "document completion routed to session");
                vec![]
            },
        }
    }

    fn request_history(&mut self) -> Vec<SessionAction> {
        let Some(room_id) = self.selected_room.clone() else {
            return vec![];
        };

        self.last_token = self.last_token.next();
        self.pending_history = Some(self.last_token);
        vec![SessionAction::Request(ApiRequest::LoadHistory { room_id, token: self.last_token })]
    }

    fn clear_selection(&mut self) {
        self.selected_room = None;
        self.messages.clear();
        self.editing_message = None;
        self.pending_history = None;
    }

    fn on_rooms_listed(&mut self, result: Result<ApiResponse, ApiError>) -> Vec<SessionAction> {
        match result {
            Ok(ApiResponse::Rooms(rooms)) => {
                self.rooms = rooms;
                let listed = |id: &RoomId| self.rooms.iter().any(|room| &room.id == id);
                if self.editing_room.as_ref().is_some_and(|edit| !listed(&edit.room_id)) {
                    self.editing_room = None;
                }
                match self.rooms.first().map(|room| room.id.clone()) {
                    Some(first) => self.select_room(&first),
                    None => {
                        self.clear_selection();
                        vec![]
                    },
                }
            },
            Ok(other) => {
                unexpected_response("list rooms", &other);
                vec![]
            },
            Err(error) => {
                tracing::error!(%error, "error fetching rooms");
                vec![]
            },
        }
    }

    fn on_room_created(&mut self, result: Result<ApiResponse, ApiError>) {
        match result {
            Ok(ApiResponse::Room(room)) => {
                self.rooms.push(room);
                self.new_room_name.clear();
            },
            Ok(other) => unexpected_response("create room", &other),
            Err(error) => tracing::error!(%error, "error creating room"),
        }
    }

    fn on_room_renamed(
        &mut self,
        room_id: &RoomId,
        name: String,
        result: Result<ApiResponse, ApiError>,
    ) {
        match result {
            Ok(_) => {
                if let Some(room) = self.rooms.iter_mut().find(|room| &room.id == room_id) {
                    room.name = name;
                }
            },
            Err(error) => tracing::error!(%error, %room_id, "error editing room"),
        }

        if self.editing_room.as_ref().is_some_and(|edit| &edit.room_id == room_id) {
            self.editing_room = None;
        }
    }

    fn on_room_deleted(
        &mut self,
        room_id: &RoomId,
        result: Result<ApiResponse, ApiError>,
    ) -> Vec<SessionAction> {
        if let Err(error) = result {
            tracing::error!(%error, %room_id, "error deleting room");
            return vec![];
        }

        self.rooms.retain(|room| &room.id != room_id);
        if self.editing_room.as_ref().is_some_and(|edit| &edit.room_id == room_id) {
            self.editing_room = None;
        }
        if self.selected_room.as_ref() != Some(room_id) {
            return vec![];
        }

        self.clear_selection();
        match self.rooms.first().map(|room| room.id.clone()) {
            Some(first) => self.select_room(&first),
            None => vec![],
        }
    }

    fn on_history_loaded(
        &mut self,
        room_id: &RoomId,
        token: HistoryToken,
        result: Result<ApiResponse, ApiError>,
    ) {
        if self.pending_history != Some(token) || self.selected_room.as_ref() != Some(room_id) {
            tracing::debug!(%room_id, token = token.0, "discarding stale history");
            return;
        }

        self.pending_history = None;
        match result {
            Ok(ApiResponse::History(records)) => {
                self.messages = flatten_history(&records);
                let shown = |id: &QueryId| self.messages.iter().any(|message| &message.id == id);
                if self.editing_message.as_ref().is_some_and(|edit| !shown(&edit.query_id)) {
                    self.editing_message = None;
                }
            },
            Ok(other) => unexpected_response("load history", &other),
            Err(error) => tracing::error!(%error, %room_id, "error fetching messages"),
        }
    }

    fn on_query_submitted(
        &mut self,
        room_id: &RoomId,
        result: Result<ApiResponse, ApiError>,
    ) -> Vec<SessionAction> {
        self.is_loading = false;

        match result {
            Ok(ApiResponse::Query(record)) => {
                self.input.clear();
                if self.selected_room.as_ref() != Some(room_id) {
                    tracing::debug!(%room_id, "room changed before query completed");
                    return vec![];
                }
                // An in-flight refetch may predate this query; supersede it
                // instead of appending to a list it is about to replace.
                if self.pending_history.is_some() {
                    return self.request_history();
                }
                self.messages.extend(Message::pair(&record));
                vec![]
            },
            Ok(other) => {
                unexpected_response("submit query", &other);
                vec![]
            },
            Err(error) => {
                tracing::error!(%error, %room_id, "error submitting chat");
                vec![]
            },
        }
    }

    fn on_query_edited(
        &mut self,
        room_id: &RoomId,
        query_id: &QueryId,
        result: Result<ApiResponse, ApiError>,
    ) -> Vec<SessionAction> {
        let is_current = self.editing_message.as_ref().is_some_and(|edit| &edit.query_id == query_id);

        match result {
            Ok(_) => {
                if is_current {
                    self.editing_message = None;
                }
                if self.selected_room.as_ref() == Some(room_id) {
                    self.request_history()
                } else {
                    vec![]
                }
            },
            Err(error) => {
                tracing::error!(%error, %query_id, "error editing message");
                if let Some(edit) = self.editing_message.as_mut().filter(|_| is_current) {
                    edit.saving = false;
                }
                vec![]
            },
        }
    }

    /// All rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Messages of the selected room.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Currently selected room. `None` if no room is selected.
    pub fn selected_room(&self) -> Option<&RoomId> {
        self.selected_room.as_ref()
    }

    /// Chat input line.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Draft name for the next room.
    pub fn new_room_name(&self) -> &str {
        &self.new_room_name
    }

    /// A query submission is in flight and has not been stopped.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Room in rename-mode. `None` if no rename is in progress.
    pub fn editing_room(&self) -> Option<&RoomEdit> {
        self.editing_room.as_ref()
    }

    /// Message in edit-mode. `None` if no message is being edited.
    pub fn editing_message(&self) -> Option<&MessageEdit> {
        self.editing_message.as_ref()
    }

    /// Last history token issued.
    pub fn last_history_token(&self) -> HistoryToken {
        self.last_token
    }

    /// Token of the history refetch still awaited. `None` if none is pending.
    pub fn pending_history(&self) -> Option<HistoryToken> {
        self.pending_history
    }
}

fn unexpected_response(operation: &str, response: &ApiResponse) {
    tracing::error!(operation, ?response, "unexpected response shape");
}
