//! Terminal UI for Chatmate
//!
//! A thin shell over [`chatmate_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`chatmate_app::Runtime`].
//!
//! This crate only handles terminal rendering and spawning HTTP requests.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod terminal;
pub mod ui;

pub use chatmate_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
