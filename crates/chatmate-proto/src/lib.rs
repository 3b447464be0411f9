//! Chatmate wire protocol
//!
//! Typed representation of the Chatmate REST API: the JSON bodies exchanged
//! with the backend, the identifiers it hands out, and the table of endpoints
//! relative to the deployment's base URL.
//!
//! This crate performs no I/O. The HTTP transport lives in `chatmate-client`
//! behind the `transport` feature.
//!
//! # Components
//!
//! - [`Room`], [`QueryRecord`], [`Document`]: resources returned by the backend
//! - [`Message`]: client-side chat entry derived from a [`QueryRecord`]
//! - [`Endpoint`]: resource paths, one per REST route
//! - [`RoomId`], [`QueryId`], [`DocumentId`]: backend identifiers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod endpoint;
mod ids;
mod message;
pub mod payloads;

pub use endpoint::{Endpoint, Method};
pub use ids::{DocumentId, QueryId, RoomId};
pub use message::{Message, Role, flatten_history};
pub use payloads::{
    chat::{ChatQuery, Envelope, QueryEdit, QueryRecord},
    document::{Document, DocumentForm, DocumentSource},
    room::{Room, RoomName},
};
