//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use chatmate_client::ApiRequest;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Discard all client state and mount a fresh App.
    Reload,

    /// Perform a request without waiting for it. The outcome comes back as
    /// [`crate::AppEvent::Completed`].
    Dispatch(ApiRequest),
}
