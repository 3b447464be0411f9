//! Decoding tests against backend-shaped JSON and properties of history
//! flattening.

use chatmate_proto::{
    ChatQuery, Document, DocumentId, Envelope, Message, QueryId, QueryRecord, Role, Room, RoomId,
    flatten_history,
};
use proptest::prelude::*;

#[test]
fn decodes_room_list() {
    let json = r#"[{"id": 1, "name": "General"}, {"id": "2", "name": "Ops"}]"#;
    let rooms: Vec<Room> = serde_json::from_str(json).unwrap();

    assert_eq!(rooms, vec![Room::new(1, "General"), Room::new("2", "Ops")]);
}

#[test]
fn decodes_history_envelope() {
    let json = r#"{
        "body": [
            {"id": 10, "query_text": "hi", "response_text": "hello", "created_at": "2024-06-01T12:00:00Z"},
            {"id": 11, "query_text": "again", "response_text": "sure"}
        ]
    }"#;
    let history: Envelope<Vec<QueryRecord>> = serde_json::from_str(json).unwrap();

    assert_eq!(history.body.len(), 2);
    assert_eq!(history.body[0].id, QueryId::from(10));
    assert_eq!(history.body[1].created_at, None);
}

#[test]
fn decodes_document_with_null_link() {
    let json = r#"{
        "id": 4,
        "title": "Manual",
        "file": "http://localhost:8000/media/manual.pdf",
        "link": null,
        "uploaded_at": "2024-06-01T12:00:00Z"
    }"#;
    let doc: Document = serde_json::from_str(json).unwrap();

    assert_eq!(doc.id, DocumentId(4));
    assert_eq!(doc.link, None);
    assert_eq!(doc.location(), Some("http://localhost:8000/media/manual.pdf"));
}

#[test]
fn link_wins_over_file_for_location() {
    let doc = Document {
        id: DocumentId(1),
        title: "Spec".into(),
        file: Some(String::new()),
        link: Some("https://example.com/spec".into()),
        uploaded_at: "2024-06-01T12:00:00Z".into(),
    };

    assert_eq!(doc.location(), Some("https://example.com/spec"));
}

#[test]
fn chat_query_body_matches_backend_fields() {
    let body = ChatQuery { query: "hi".into(), room: RoomId::from(3) };
    let value = serde_json::to_value(&body).unwrap();

    assert_eq!(value, serde_json::json!({"query": "hi", "room": 3}));
}

fn record_strategy() -> impl Strategy<Value = QueryRecord> {
    (0u64..10_000, ".{0,16}", ".{0,16}").prop_map(|(id, query_text, response_text)| QueryRecord {
        id: QueryId::from(id),
        query_text,
        response_text,
        created_at: None,
    })
}

proptest! {
    #[test]
    fn prop_flatten_yields_user_system_pairs(records in prop::collection::vec(record_strategy(), 0..20)) {
        let messages = flatten_history(&records);

        prop_assert_eq!(messages.len(), records.len() * 2);
        for (pair, record) in messages.chunks(2).zip(&records) {
            let [user, system] = pair else {
                return Err(TestCaseError::fail("odd message count"));
            };
            prop_assert_eq!(user.role, Role::User);
            prop_assert_eq!(system.role, Role::System);
            prop_assert_eq!(&user.id, &record.id);
            prop_assert_eq!(&system.id, &record.id);
            prop_assert_eq!(&user.content, &record.query_text);
            prop_assert_eq!(&system.content, &record.response_text);
        }
    }

    #[test]
    fn prop_room_id_survives_json(id in any::<u64>()) {
        let room = RoomId::from(id);
        let encoded = serde_json::to_string(&room).unwrap();
        let decoded: RoomId = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, room);
    }
}

#[test]
fn user_message_carries_query_text() {
    let record = QueryRecord {
        id: QueryId::from(1),
        query_text: "q".into(),
        response_text: "r".into(),
        created_at: None,
    };

    assert_eq!(Message::user(&record).content, "q");
    assert_eq!(Message::system(&record).content, "r");
}
