//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use chatmate_app::Field;
use chatmate_client::Role;

use super::{AppSnapshot, Invariant, InvariantResult, Violation};

/// Selected room must exist in the room list.
///
/// A deleted room or a refreshed list that no longer contains the selection
/// must move or clear the selection.
pub struct SelectedRoomInRooms;

impl Invariant for SelectedRoomInRooms {
    fn name(&self) -> &'static str {
        "selected_room_in_rooms"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        match &state.selected_room {
            Some(selected) if !state.rooms.contains(selected) => Err(Violation {
                invariant: self.name(),
                message: format!("selected room {selected} not in rooms {:?}", state.rooms),
            }),
            _ => Ok(()),
        }
    }
}

/// Without a selected room there are no messages to show.
pub struct MessagesRequireSelection;

impl Invariant for MessagesRequireSelection {
    fn name(&self) -> &'static str {
        "messages_require_selection"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        if state.selected_room.is_none() && !state.messages.is_empty() {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} messages shown with no room selected", state.messages.len()),
            });
        }
        Ok(())
    }
}

/// Messages come in user/system pairs sharing a query id.
///
/// A history load replaces the list wholesale and a submit appends both
/// halves at once, so a lone half means a partial update leaked.
pub struct MessagesArePairs;

impl Invariant for MessagesArePairs {
    fn name(&self) -> &'static str {
        "messages_are_pairs"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        if state.messages.len() % 2 != 0 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("odd message count {}", state.messages.len()),
            });
        }

        for (index, pair) in state.messages.chunks_exact(2).enumerate() {
            let [user, system] = pair else { continue };
            if user.role != Role::User || system.role != Role::System || user.id != system.id {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "pair {index}: ({}, {}) / ({}, {})",
                        user.id,
                        user.role.as_str(),
                        system.id,
                        system.role.as_str()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Anything in edit-mode must still be on screen.
pub struct EditTargetsExist;

impl Invariant for EditTargetsExist {
    fn name(&self) -> &'static str {
        "edit_targets_exist"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        if let Some(room_id) = &state.editing_room {
            if !state.rooms.contains(room_id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("renaming room {room_id} which is not listed"),
                });
            }
        }

        if let Some(query_id) = &state.editing_message {
            let shown = state
                .messages
                .iter()
                .any(|message| &message.id == query_id && message.role == Role::User);
            if !shown {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("editing query {query_id} which is not shown"),
                });
            }
        }

        if let Some(document_id) = state.editing_document {
            if !state.documents.contains(&document_id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("editing document {document_id} which is not listed"),
                });
            }
        }
        Ok(())
    }
}

/// List cursors point into their lists, or at 0 for an empty list.
pub struct CursorsInBounds;

impl Invariant for CursorsInBounds {
    fn name(&self) -> &'static str {
        "cursors_in_bounds"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        let cursors = [
            ("room", state.room_cursor, state.rooms.len()),
            ("message", state.message_cursor, state.messages.len()),
            ("document", state.document_cursor, state.documents.len()),
        ];

        for (list, cursor, len) in cursors {
            if cursor >= len.max(1) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("{list} cursor {cursor} out of bounds for length {len}"),
                });
            }
        }
        Ok(())
    }
}

/// The awaited history refetch is always the most recent one issued.
///
/// Any older token in flight is stale and must be ignored on arrival.
pub struct PendingHistoryIsLatest;

impl Invariant for PendingHistoryIsLatest {
    fn name(&self) -> &'static str {
        "pending_history_is_latest"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        match state.pending_history {
            Some(pending) if pending != state.last_history_token => Err(Violation {
                invariant: self.name(),
                message: format!(
                    "awaiting token {} but last issued is {}",
                    pending.0, state.last_history_token.0
                ),
            }),
            _ => Ok(()),
        }
    }
}

/// A field bound to an edit-mode is only open while that edit-mode is.
pub struct FieldMatchesEditMode;

impl Invariant for FieldMatchesEditMode {
    fn name(&self) -> &'static str {
        "field_matches_edit_mode"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        let orphaned = match state.editing_field {
            Some(Field::RoomName) => state.editing_room.is_none(),
            Some(Field::MessageDraft) => state.editing_message.is_none(),
            Some(Field::EditTitle | Field::EditSource) => state.editing_document.is_none(),
            _ => false,
        };

        if orphaned {
            return Err(Violation {
                invariant: self.name(),
                message: format!("field {:?} open without its edit-mode", state.editing_field),
            });
        }
        Ok(())
    }
}
