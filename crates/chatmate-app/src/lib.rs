//! Application layer for Chatmate
//!
//! Pure state machines and generic runtime for the Chatmate client, so the
//! same orchestration runs in the terminal front-end and in simulation.
//!
//! # Components
//!
//! - [`App`]: UI state machine (focus, key handling, completion routing)
//! - [`LineEditor`]: cursor handling for the text field being edited
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod input;
mod runtime;

pub use action::AppAction;
pub use app::{App, Field, Pane};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{KeyInput, LineEditor};
pub use runtime::Runtime;
