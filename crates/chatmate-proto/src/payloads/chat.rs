//! Chat query payloads.
//!
//! The backend stores each exchange as one query record holding both the user
//! text and the generated response. Chat endpoints wrap their result in a
//! `{"body": ...}` envelope; room and document endpoints do not.

use serde::{Deserialize, Serialize};

use crate::{QueryId, RoomId};

/// Response wrapper used by the `query/` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Wrapped payload.
    pub body: T,
}

/// A stored user/system exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Primary key, shared by both halves of the exchange.
    pub id: QueryId,
    /// Text submitted by the user.
    pub query_text: String,
    /// Text produced by the backend.
    pub response_text: String,
    /// Creation timestamp as rendered by the backend (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for `POST query/process_chat/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatQuery {
    /// User text.
    pub query: String,
    /// Room the query belongs to.
    pub room: RoomId,
}

/// Body for `PUT query/{id}/edit_query/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEdit {
    /// Replacement user text.
    pub query: String,
}
