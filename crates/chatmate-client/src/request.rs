//! Requests and completions.

use chatmate_proto::{
    Document, DocumentForm, DocumentId, Endpoint, Envelope, Method, QueryId, QueryRecord, Room,
    RoomId,
};

/// Monotonic identifier of a history refetch.
///
/// Every refetch the session issues carries a token greater than all earlier
/// ones. A history completion is applied only if its token is the one the
/// session is still waiting for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryToken(pub u64);

impl HistoryToken {
    /// The token following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// State machine that issued a request and consumes its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// [`crate::Session`]
    Session,
    /// [`crate::DocumentManager`]
    Documents,
}

/// A request to perform against the backend.
///
/// Each variant carries everything the issuing state machine needs to
/// interpret the completion, so no per-request bookkeeping is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// `GET rooms/`
    ListRooms,

    /// `POST rooms/`
    CreateRoom {
        /// Name of the new room.
        name: String,
    },

    /// `PUT rooms/{id}/`
    RenameRoom {
        /// Room to rename.
        room_id: RoomId,
        /// New name.
        name: String,
    },

    /// `DELETE rooms/{id}/`
    DeleteRoom {
        /// Room to delete.
        room_id: RoomId,
    },

    /// `GET query/{room}/get_queries_by_room_id/`
    LoadHistory {
        /// Room whose history to load.
        room_id: RoomId,
        /// Refetch token.
        token: HistoryToken,
    },

    /// `POST query/process_chat/`
    SubmitQuery {
        /// Room the query is posted to.
        room_id: RoomId,
        /// User text.
        query: String,
    },

    /// `PUT query/{id}/edit_query/`
    EditQuery {
        /// Room that was active when the edit was saved.
        room_id: RoomId,
        /// Query to edit.
        query_id: QueryId,
        /// Replacement text.
        query: String,
    },

    /// `GET document/`
    ListDocuments,

    /// `POST document/upload_file/`
    UploadDocument {
        /// Title and content.
        form: DocumentForm,
    },

    /// `PUT document/{id}/update_document/`
    UpdateDocument {
        /// Document to update.
        document_id: DocumentId,
        /// New title and optional new content.
        form: DocumentForm,
    },

    /// `DELETE document/{id}/`
    DeleteDocument {
        /// Document to delete.
        document_id: DocumentId,
    },
}

impl ApiRequest {
    /// Resource path of this request.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::ListRooms | Self::CreateRoom { .. } => Endpoint::Rooms,
            Self::RenameRoom { room_id, .. } | Self::DeleteRoom { room_id } => {
                Endpoint::Room(room_id.clone())
            },
            Self::LoadHistory { room_id, .. } => Endpoint::RoomQueries(room_id.clone()),
            Self::SubmitQuery { .. } => Endpoint::ProcessChat,
            Self::EditQuery { query_id, .. } => Endpoint::EditQuery(query_id.clone()),
            Self::ListDocuments => Endpoint::Documents,
            Self::UploadDocument { .. } => Endpoint::UploadDocument,
            Self::UpdateDocument { document_id, .. } => Endpoint::UpdateDocument(*document_id),
            Self::DeleteDocument { document_id } => Endpoint::Document(*document_id),
        }
    }

    /// HTTP method of this request.
    pub fn method(&self) -> Method {
        match self {
            Self::ListRooms | Self::LoadHistory { .. } | Self::ListDocuments => Method::Get,
            Self::CreateRoom { .. } | Self::SubmitQuery { .. } | Self::UploadDocument { .. } => {
                Method::Post
            },
            Self::RenameRoom { .. } | Self::EditQuery { .. } | Self::UpdateDocument { .. } => {
                Method::Put
            },
            Self::DeleteRoom { .. } | Self::DeleteDocument { .. } => Method::Delete,
        }
    }

    /// State machine that consumes the completion of this request.
    pub fn owner(&self) -> Owner {
        match self {
            Self::ListDocuments
            | Self::UploadDocument { .. }
            | Self::UpdateDocument { .. }
            | Self::DeleteDocument { .. } => Owner::Documents,
            _ => Owner::Session,
        }
    }

    /// Decode a 2xx response body for this request.
    ///
    /// Requests whose result the client never reads decode to
    /// [`ApiResponse::Empty`] regardless of the body.
    pub fn decode_response(&self, body: &[u8]) -> Result<ApiResponse, serde_json::Error> {
        match self {
            Self::ListRooms => serde_json::from_slice(body).map(ApiResponse::Rooms),
            Self::CreateRoom { .. } => serde_json::from_slice(body).map(ApiResponse::Room),
            Self::LoadHistory { .. } => serde_json::from_slice::<Envelope<Vec<QueryRecord>>>(body)
                .map(|envelope| ApiResponse::History(envelope.body)),
            Self::SubmitQuery { .. } => serde_json::from_slice::<Envelope<QueryRecord>>(body)
                .map(|envelope| ApiResponse::Query(envelope.body)),
            Self::ListDocuments => serde_json::from_slice(body).map(ApiResponse::Documents),
            Self::UploadDocument { .. } => serde_json::from_slice(body).map(ApiResponse::Document),
            Self::RenameRoom { .. }
            | Self::DeleteRoom { .. }
            | Self::EditQuery { .. }
            | Self::UpdateDocument { .. }
            | Self::DeleteDocument { .. } => Ok(ApiResponse::Empty),
        }
    }
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// All rooms.
    Rooms(Vec<Room>),
    /// A single room.
    Room(Room),
    /// A room's stored history, oldest first.
    History(Vec<QueryRecord>),
    /// A newly processed query.
    Query(QueryRecord),
    /// All documents.
    Documents(Vec<Document>),
    /// A single document.
    Document(Document),
    /// Body not needed by the client.
    Empty,
}

/// Outcome of a dispatched request, fed back to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The request as it was issued.
    pub request: ApiRequest,
    /// Decoded response or failure.
    pub result: Result<ApiResponse, crate::ApiError>,
}

impl Completion {
    /// Successful completion.
    pub fn ok(request: ApiRequest, response: ApiResponse) -> Self {
        Self { request, result: Ok(response) }
    }

    /// Failed completion.
    pub fn err(request: ApiRequest, error: crate::ApiError) -> Self {
        Self { request, result: Err(error) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn history_decodes_from_envelope() {
        let request = ApiRequest::LoadHistory { room_id: RoomId::from(1), token: HistoryToken(1) };
        let body = br#"{"body": [{"id": 1, "query_text": "q", "response_text": "r"}]}"#;

        let response = request.decode_response(body).unwrap();

        assert!(matches!(response, ApiResponse::History(ref records) if records.len() == 1));
    }

    #[test]
    fn bodies_the_client_ignores_decode_to_empty() {
        let request = ApiRequest::RenameRoom { room_id: RoomId::from(1), name: "x".into() };
        assert_eq!(request.decode_response(b"not json").unwrap(), ApiResponse::Empty);
    }

    #[test]
    fn malformed_room_list_is_a_decode_error() {
        assert!(ApiRequest::ListRooms.decode_response(br#"{"rooms": []}"#).is_err());
    }

    #[test]
    fn document_requests_are_owned_by_documents() {
        let requests = [
            ApiRequest::ListDocuments,
            ApiRequest::DeleteDocument { document_id: DocumentId(1) },
        ];
        assert!(requests.iter().all(|r| r.owner() == Owner::Documents));
        assert_eq!(ApiRequest::ListRooms.owner(), Owner::Session);
    }

    #[test]
    fn methods_follow_rest_conventions() {
        let room_id = RoomId::from(1);
        assert_eq!(ApiRequest::ListRooms.method(), Method::Get);
        assert_eq!(ApiRequest::CreateRoom { name: "a".into() }.method(), Method::Post);
        assert_eq!(
            ApiRequest::RenameRoom { room_id: room_id.clone(), name: "a".into() }.method(),
            Method::Put
        );
        assert_eq!(ApiRequest::DeleteRoom { room_id }.method(), Method::Delete);
    }
}
