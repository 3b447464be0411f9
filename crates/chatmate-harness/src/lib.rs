//! Deterministic simulation harness for Chatmate client testing.
//!
//! An in-memory backend with REST semantics and a [`SimDriver`] implementing
//! [`chatmate_app::Driver`], so the production [`chatmate_app::Runtime`] runs
//! unchanged in tests. Requests stay in flight until the test completes them,
//! in any order it chooses, which makes out-of-order responses reproducible.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the common
//! App invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod invariants;
pub mod sim_driver;

pub use backend::FakeBackend;
pub use invariants::{
    AppSnapshot, CursorsInBounds, EditTargetsExist, FieldMatchesEditMode, Invariant,
    InvariantRegistry, InvariantResult, MessageSnapshot, MessagesArePairs,
    MessagesRequireSelection, PendingHistoryIsLatest, SelectedRoomInRooms, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};
