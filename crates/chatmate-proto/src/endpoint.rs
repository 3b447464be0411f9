//! REST endpoint table.
//!
//! Paths are relative to the deployment base URL and always end with a
//! trailing slash; the backend redirects slashless paths, which would turn a
//! `POST` into a `GET`.

use std::fmt;

use crate::{DocumentId, QueryId, RoomId};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// A backend resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `rooms/`
    Rooms,
    /// `rooms/{id}/`
    Room(RoomId),
    /// `query/{room}/get_queries_by_room_id/`
    RoomQueries(RoomId),
    /// `query/process_chat/`
    ProcessChat,
    /// `query/{id}/edit_query/`
    EditQuery(QueryId),
    /// `document/`
    Documents,
    /// `document/upload_file/`
    UploadDocument,
    /// `document/{id}/update_document/`
    UpdateDocument(DocumentId),
    /// `document/{id}/`
    Document(DocumentId),
}

impl Endpoint {
    /// Path relative to the base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Rooms => "rooms/".to_string(),
            Self::Room(id) => format!("rooms/{id}/"),
            Self::RoomQueries(id) => format!("query/{id}/get_queries_by_room_id/"),
            Self::ProcessChat => "query/process_chat/".to_string(),
            Self::EditQuery(id) => format!("query/{id}/edit_query/"),
            Self::Documents => "document/".to_string(),
            Self::UploadDocument => "document/upload_file/".to_string(),
            Self::UpdateDocument(id) => format!("document/{id}/update_document/"),
            Self::Document(id) => format!("document/{id}/"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
