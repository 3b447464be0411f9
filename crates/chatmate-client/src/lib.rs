//! Client
//!
//! Action-based client state machines for the Chatmate REST API. Owns the
//! visible conversation, the room list, edit-mode state and the document
//! list, and keeps them in sync with the backend.
//!
//! # Architecture
//!
//! Both state machines are Sans-IO. Operations return the [`ApiRequest`]s the
//! caller must perform; the caller feeds each outcome back as a
//! [`Completion`]. Local state only changes in response to user operations or
//! completions, never by performing I/O.
//!
//! # Components
//!
//! - [`Session`]: rooms, messages, input and edit-mode state
//! - [`DocumentManager`]: document upload, listing, edit and delete
//! - [`ApiRequest`] / [`ApiResponse`]: requests out, decoded responses in
//! - [`SessionAction`]: actions the session produces for the caller
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides
//! [`transport::HttpTransport`], a reqwest client that executes requests
//! against a configured base URL.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod documents;
mod error;
mod request;
mod session;

#[cfg(feature = "transport")]
pub mod transport;

pub use chatmate_proto::{
    Document, DocumentForm, DocumentId, DocumentSource, Message, QueryId, QueryRecord, Role, Room,
    RoomId,
};
pub use documents::{DocumentEdit, DocumentManager, SourceMode};
pub use error::ApiError;
pub use request::{ApiRequest, ApiResponse, Completion, HistoryToken, Owner};
pub use session::{MessageEdit, RoomEdit, Session, SessionAction};
