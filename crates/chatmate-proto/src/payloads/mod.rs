//! JSON and multipart bodies exchanged with the backend.
//!
//! Field names follow the backend's snake_case serializers verbatim. Response
//! types tolerate missing optional fields; request types serialize exactly the
//! fields the backend reads.

pub mod chat;
pub mod document;
pub mod room;
