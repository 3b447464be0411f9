//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use chatmate_client::ApiRequest;

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal front-end and in
/// simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, reqwest on spawned tokio tasks
///   for requests
/// - **Simulation**: scripted key presses and an in-memory backend that
///   completes requests in a chosen order
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Returns the next event, or `None` if no event is ready.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Start a request without waiting for it.
    ///
    /// The outcome must later be delivered by [`Driver::poll_event`] as
    /// [`AppEvent::Completed`]. Requests may complete in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be handed off.
    fn dispatch(&mut self, request: ApiRequest) -> Result<(), Self::Error>;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Abandon every request dispatched so far.
    ///
    /// None of their outcomes may be delivered by [`Driver::poll_event`]
    /// afterwards, including outcomes that were already received but not yet
    /// polled. Called when the App is rebuilt on reload.
    fn cancel_requests(&mut self);

    /// Stop in-flight work and clean up resources.
    fn stop(&mut self);
}
