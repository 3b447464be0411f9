//! Room resources.

use serde::{Deserialize, Serialize};

use crate::RoomId;

/// A named conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Backend primary key.
    pub id: RoomId,
    /// Display name.
    pub name: String,
}

impl Room {
    /// Create a room value.
    pub fn new(id: impl Into<RoomId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Body for `POST rooms/` and `PUT rooms/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomName {
    /// New or updated room name.
    pub name: String,
}
