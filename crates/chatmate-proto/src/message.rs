//! Client-side chat entries.
//!
//! A [`QueryRecord`] expands into two messages: the user's text followed by
//! the system's response, both carrying the record's id.

use crate::{QueryId, QueryRecord};

/// Author role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Text typed by the user.
    User,
    /// Backend response.
    System,
    /// Function call output.
    Function,
    /// Structured data.
    Data,
    /// Assistant output.
    Assistant,
    /// Tool output.
    Tool,
}

impl Role {
    /// Lowercase role label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Function => "function",
            Self::Data => "data",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// A chat message displayed in a room.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Id of the query this message came from.
    pub id: QueryId,
    /// Message text.
    pub content: String,
    /// Author role.
    pub role: Role,
    /// Creation timestamp. `None` if the backend omitted it.
    pub created_at: Option<String>,
    /// Opaque annotations attached to the message.
    pub annotations: Vec<serde_json::Value>,
}

impl Message {
    /// User half of a query record.
    pub fn user(record: &QueryRecord) -> Self {
        Self::from_record(record, record.query_text.clone(), Role::User)
    }

    /// System half of a query record.
    pub fn system(record: &QueryRecord) -> Self {
        Self::from_record(record, record.response_text.clone(), Role::System)
    }

    /// Both halves of a query record, user first.
    pub fn pair(record: &QueryRecord) -> [Self; 2] {
        [Self::user(record), Self::system(record)]
    }

    fn from_record(record: &QueryRecord, content: String, role: Role) -> Self {
        Self {
            id: record.id.clone(),
            content,
            role,
            created_at: record.created_at.clone(),
            annotations: Vec::new(),
        }
    }
}

/// Flatten a room's stored history into display order.
pub fn flatten_history(records: &[QueryRecord]) -> Vec<Message> {
    records.iter().flat_map(Message::pair).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, query: &str, response: &str) -> QueryRecord {
        QueryRecord {
            id: QueryId::from(id),
            query_text: query.into(),
            response_text: response.into(),
            created_at: Some("2024-06-01T12:00:00Z".into()),
        }
    }

    #[test]
    fn pair_puts_user_before_system() {
        let [user, system] = Message::pair(&record(3, "hi", "hello"));

        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "hi");
        assert_eq!(system.role, Role::System);
        assert_eq!(system.content, "hello");
        assert_eq!(user.id, system.id);
        assert_eq!(user.created_at, system.created_at);
    }

    #[test]
    fn flatten_preserves_record_order() {
        let history = [record(1, "a", "b"), record(2, "c", "d")];
        let contents: Vec<_> =
            flatten_history(&history).into_iter().map(|m| m.content).collect();

        assert_eq!(contents, ["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_history_flattens_to_nothing() {
        assert!(flatten_history(&[]).is_empty());
    }
}
