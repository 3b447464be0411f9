//! In-memory backend with the REST semantics the client expects.
//!
//! Answers every [`ApiRequest`] the way the real service does: missing
//! resources are 404s, invalid forms are 400s, chat queries are answered
//! immediately with an echo. Failures can be forced with
//! [`FakeBackend::set_offline`].

use std::collections::BTreeMap;

use chatmate_client::{
    ApiError, ApiRequest, ApiResponse, Document, DocumentForm, DocumentId, DocumentSource,
    QueryId, QueryRecord, Room, RoomId,
};

/// Base URL reported in errors.
pub const FAKE_BASE_URL: &str = "http://fake.backend/api/chatmate/api/";

/// Media prefix for uploaded file URLs.
const MEDIA_URL: &str = "http://fake.backend/media/";

/// Timestamp stamped on everything the fake backend creates.
const CREATED_AT: &str = "2024-06-01T12:00:00Z";

/// In-memory chat backend.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    rooms: Vec<Room>,
    queries: BTreeMap<RoomId, Vec<QueryRecord>>,
    documents: Vec<Document>,
    next_id: u64,
    offline: bool,
}

impl FakeBackend {
    /// Empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with one room per name.
    pub fn with_rooms<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut backend = Self::new();
        for name in names {
            backend.add_room(name);
        }
        backend
    }

    /// Create a room directly, bypassing the API.
    pub fn add_room(&mut self, name: impl Into<String>) -> Room {
        let room = Room::new(self.allocate_id(), name);
        self.queries.insert(room.id.clone(), Vec::new());
        self.rooms.push(room.clone());
        room
    }

    /// Store an answered query directly, bypassing the API.
    ///
    /// Returns `None` if the room does not exist.
    pub fn add_query(&mut self, room_id: &RoomId, query: &str) -> Option<QueryRecord> {
        let record = self.answer(query);
        self.queries.get_mut(room_id)?.push(record.clone());
        Some(record)
    }

    /// Register a link document directly, bypassing the API.
    pub fn add_link_document(&mut self, title: &str, link: &str) -> Document {
        let document = Document {
            id: DocumentId(self.allocate_id()),
            title: title.to_string(),
            file: None,
            link: Some(link.to_string()),
            uploaded_at: CREATED_AT.to_string(),
        };
        self.documents.push(document.clone());
        document
    }

    /// Make every request fail with a transport error until reset.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Stored rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Stored history of a room, oldest first.
    pub fn queries(&self, room_id: &RoomId) -> &[QueryRecord] {
        self.queries.get(room_id).map_or(&[], Vec::as_slice)
    }

    /// Stored documents.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Execute a request against the stored state.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] while offline
    /// - [`ApiError::Status`] 404 for missing rooms, queries and documents
    /// - [`ApiError::Status`] 400 for document forms without title or source
    pub fn execute(&mut self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{FAKE_BASE_URL}{}", request.endpoint());
        if self.offline {
            return Err(ApiError::Transport { url, message: "connection refused".into() });
        }

        let response = match request {
            ApiRequest::ListRooms => Some(ApiResponse::Rooms(self.rooms.clone())),
            ApiRequest::CreateRoom { name } => {
                Some(ApiResponse::Room(self.add_room(name.clone())))
            },
            ApiRequest::RenameRoom { room_id, name } => {
                self.rooms.iter_mut().find(|room| &room.id == room_id).map(|room| {
                    room.name.clone_from(name);
                    ApiResponse::Empty
                })
            },
            ApiRequest::DeleteRoom { room_id } => {
                let before = self.rooms.len();
                self.rooms.retain(|room| &room.id != room_id);
                self.queries.remove(room_id);
                (self.rooms.len() < before).then_some(ApiResponse::Empty)
            },
            ApiRequest::LoadHistory { room_id, .. } => {
                self.queries.get(room_id).map(|records| ApiResponse::History(records.clone()))
            },
            ApiRequest::SubmitQuery { room_id, query } => {
                self.add_query(room_id, query).map(ApiResponse::Query)
            },
            ApiRequest::EditQuery { query_id, query, .. } => {
                self.find_query(query_id).map(|record| {
                    record.query_text.clone_from(query);
                    ApiResponse::Empty
                })
            },
            ApiRequest::ListDocuments => Some(ApiResponse::Documents(self.documents.clone())),
            ApiRequest::UploadDocument { form } => {
                let document = self.upload(form).ok_or_else(|| bad_request(url))?;
                return Ok(ApiResponse::Document(document));
            },
            ApiRequest::UpdateDocument { document_id, form } => {
                if form.title.trim().is_empty() {
                    return Err(bad_request(url));
                }
                self.documents.iter_mut().find(|document| document.id == *document_id).map(
                    |document| {
                        document.title.clone_from(&form.title);
                        if let Some(source) = &form.source {
                            let (file, link) = stored_source(source);
                            document.file = file;
                            document.link = link;
                        }
                        ApiResponse::Empty
                    },
                )
            },
            ApiRequest::DeleteDocument { document_id } => {
                let before = self.documents.len();
                self.documents.retain(|document| document.id != *document_id);
                (self.documents.len() < before).then_some(ApiResponse::Empty)
            },
        };

        response.ok_or_else(|| {
            tracing::debug!(%url, "fake backend: not found");
            ApiError::Status { url, status: 404, body: "Not found.".into() }
        })
    }

    fn upload(&mut self, form: &DocumentForm) -> Option<Document> {
        let source = form.source.as_ref()?;
        if form.title.trim().is_empty() {
            return None;
        }

        let (file, link) = stored_source(source);
        let document = Document {
            id: DocumentId(self.allocate_id()),
            title: form.title.clone(),
            file,
            link,
            uploaded_at: CREATED_AT.to_string(),
        };
        self.documents.push(document.clone());
        Some(document)
    }

    fn find_query(&mut self, query_id: &QueryId) -> Option<&mut QueryRecord> {
        self.queries.values_mut().flatten().find(|record| &record.id == query_id)
    }

    fn answer(&mut self, query: &str) -> QueryRecord {
        QueryRecord {
            id: QueryId::from(self.allocate_id()),
            query_text: query.to_string(),
            response_text: format!("Echo: {query}"),
            created_at: Some(CREATED_AT.to_string()),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

fn stored_source(source: &DocumentSource) -> (Option<String>, Option<String>) {
    match source {
        DocumentSource::File(path) => {
            let name = path.file_name().map_or_else(
                || "upload".to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            (Some(format!("{MEDIA_URL}{name}")), None)
        },
        DocumentSource::Link(link) => (None, Some(link.clone())),
    }
}

fn bad_request(url: String) -> ApiError {
    ApiError::Status { url, status: 400, body: "title and file or link are required".into() }
}

#[cfg(test)]
mod tests {
    use chatmate_client::HistoryToken;

    use super::*;

    #[test]
    fn submitted_queries_appear_in_history() {
        let mut backend = FakeBackend::with_rooms(["General"]);
        let room_id = backend.rooms()[0].id.clone();

        let submit = ApiRequest::SubmitQuery { room_id: room_id.clone(), query: "hi".into() };
        let Ok(ApiResponse::Query(record)) = backend.execute(&submit) else {
            panic!("expected query record");
        };
        assert_eq!(record.response_text, "Echo: hi");

        let history = ApiRequest::LoadHistory { room_id, token: HistoryToken(1) };
        assert_eq!(backend.execute(&history), Ok(ApiResponse::History(vec![record])));
    }

    #[test]
    fn deleted_room_is_not_found() {
        let mut backend = FakeBackend::with_rooms(["General"]);
        let room_id = backend.rooms()[0].id.clone();

        let delete = ApiRequest::DeleteRoom { room_id: room_id.clone() };
        assert_eq!(backend.execute(&delete), Ok(ApiResponse::Empty));

        let result = backend.execute(&ApiRequest::RenameRoom { room_id, name: "x".into() });
        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
    }

    #[test]
    fn upload_without_source_is_rejected() {
        let mut backend = FakeBackend::new();
        let form = DocumentForm { title: "Manual".into(), source: None };

        let result = backend.execute(&ApiRequest::UploadDocument { form });

        assert!(matches!(result, Err(ApiError::Status { status: 400, .. })));
        assert!(backend.documents().is_empty());
    }

    #[test]
    fn title_only_update_keeps_content() {
        let mut backend = FakeBackend::new();
        let document = backend.add_link_document("Manual", "https://example.com");

        let form = DocumentForm { title: "Guide".into(), source: None };
        let update = ApiRequest::UpdateDocument { document_id: document.id, form };
        assert_eq!(backend.execute(&update), Ok(ApiResponse::Empty));

        assert_eq!(backend.documents()[0].title, "Guide");
        assert_eq!(backend.documents()[0].location(), Some("https://example.com"));
    }

    #[test]
    fn offline_backend_fails_every_request() {
        let mut backend = FakeBackend::with_rooms(["General"]);
        backend.set_offline(true);

        let result = backend.execute(&ApiRequest::ListRooms);

        assert!(matches!(result, Err(ApiError::Transport { .. })));
    }
}
