//! HTTP transport tests against a mock backend.

use std::io::Write;

use chatmate_client::{
    ApiError, ApiRequest, ApiResponse, DocumentId, HistoryToken, QueryId, Room, RoomId,
    transport::{HttpTransport, TransportConfig},
};
use chatmate_proto::{DocumentForm, DocumentSource};
use httpmock::prelude::*;
use serde_json::json;

const PREFIX: &str = "/api/chatmate/api";

fn transport(server: &MockServer) -> HttpTransport {
    // No trailing slash: the transport must add it.
    let config = TransportConfig { base_url: server.url(PREFIX) };
    HttpTransport::new(&config).unwrap()
}

fn path(rest: &str) -> String {
    format!("{PREFIX}/{rest}")
}

#[tokio::test]
async fn lists_rooms() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(path("rooms/"));
            then.status(200).json_body(json!([{"id": 1, "name": "General"}]));
        })
        .await;

    let response = transport(&server).execute(&ApiRequest::ListRooms).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response, ApiResponse::Rooms(vec![Room::new(1, "General")]));
}

#[tokio::test]
async fn creates_room_with_name_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(path("rooms/")).json_body(json!({"name": "Ops"}));
            then.status(201).json_body(json!({"id": 7, "name": "Ops"}));
        })
        .await;

    let request = ApiRequest::CreateRoom { name: "Ops".into() };
    let response = transport(&server).execute(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response, ApiResponse::Room(Room::new(7, "Ops")));
}

#[tokio::test]
async fn submits_query_with_room_and_unwraps_envelope() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(path("query/process_chat/"))
                .json_body(json!({"query": "hi", "room": 3}));
            then.status(200).json_body(json!({
                "body": {"id": 12, "query_text": "hi", "response_text": "hello", "created_at": "2024-06-01T12:00:00Z"}
            }));
        })
        .await;

    let request = ApiRequest::SubmitQuery { room_id: RoomId::from(3), query: "hi".into() };
    let response = transport(&server).execute(&request).await.unwrap();

    mock.assert_async().await;
    let ApiResponse::Query(record) = response else { panic!("expected query record") };
    assert_eq!(record.id, QueryId::from(12));
    assert_eq!(record.response_text, "hello");
}

#[tokio::test]
async fn loads_history_for_room() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(path("query/3/get_queries_by_room_id/"));
            then.status(200).json_body(json!({
                "body": [{"id": 1, "query_text": "a", "response_text": "b"}]
            }));
        })
        .await;

    let request = ApiRequest::LoadHistory { room_id: RoomId::from(3), token: HistoryToken(1) };
    let response = transport(&server).execute(&request).await.unwrap();

    mock.assert_async().await;
    assert!(matches!(response, ApiResponse::History(ref records) if records.len() == 1));
}

#[tokio::test]
async fn edits_query_and_ignores_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT).path(path("query/12/edit_query/")).json_body(json!({"query": "fixed"}));
            then.status(200).body("ok");
        })
        .await;

    let request = ApiRequest::EditQuery {
        room_id: RoomId::from(3),
        query_id: QueryId::from(12),
        query: "fixed".into(),
    };
    let response = transport(&server).execute(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response, ApiResponse::Empty);
}

#[tokio::test]
async fn deletes_room() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path(path("rooms/5/"));
            then.status(204);
        })
        .await;

    let request = ApiRequest::DeleteRoom { room_id: RoomId::from(5) };
    let response = transport(&server).execute(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response, ApiResponse::Empty);
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET).path(path("rooms/"));
            then.status(500).body("boom");
        })
        .await;

    let err = transport(&server).execute(&ApiRequest::ListRooms).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, ref body, .. } if body == "boom"));
}

#[tokio::test]
async fn unexpected_shape_is_a_decode_error() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET).path(path("document/"));
            then.status(200).json_body(json!({"documents": []}));
        })
        .await;

    let err = transport(&server).execute(&ApiRequest::ListDocuments).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn uploads_file_as_multipart() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(path("document/upload_file/"))
                .body_contains("name=\"title\"")
                .body_contains("Manual")
                .body_contains("name=\"file\"")
                .body_contains("manual contents");
            then.status(201).json_body(json!({
                "id": 4,
                "title": "Manual",
                "file": "http://localhost:8000/media/manual.txt",
                "link": null,
                "uploaded_at": "2024-06-01T12:00:00Z"
            }));
        })
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "manual contents").unwrap();
    let request = ApiRequest::UploadDocument {
        form: DocumentForm {
            title: "Manual".into(),
            source: Some(DocumentSource::File(file.path().to_path_buf())),
        },
    };

    let response = transport(&server).execute(&request).await.unwrap();

    mock.assert_async().await;
    let ApiResponse::Document(doc) = response else { panic!("expected document") };
    assert_eq!(doc.id, DocumentId(4));
}

#[tokio::test]
async fn updates_document_with_link_field() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(path("document/4/update_document/"))
                .body_contains("name=\"link\"")
                .body_contains("https://example.com/manual");
            then.status(200).json_body(json!({}));
        })
        .await;

    let request = ApiRequest::UpdateDocument {
        document_id: DocumentId(4),
        form: DocumentForm {
            title: "Manual".into(),
            source: Some(DocumentSource::Link("https://example.com/manual".into())),
        },
    };
    let response = transport(&server).execute(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response, ApiResponse::Empty);
}

#[tokio::test]
async fn unreadable_upload_file_fails_before_sending() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(path("document/upload_file/"));
            then.status(201);
        })
        .await;

    let request = ApiRequest::UploadDocument {
        form: DocumentForm {
            title: "Missing".into(),
            source: Some(DocumentSource::File("/definitely/not/here.pdf".into())),
        },
    };
    let err = transport(&server).execute(&request).await.unwrap_err();

    assert!(matches!(err, ApiError::File { .. }));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Port 1 is reserved and refuses connections.
    let config = TransportConfig { base_url: "http://127.0.0.1:1/".into() };
    let transport = HttpTransport::new(&config).unwrap();

    let err = transport.execute(&ApiRequest::ListRooms).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
}
