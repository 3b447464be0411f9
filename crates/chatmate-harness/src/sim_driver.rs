//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`chatmate_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Dispatched requests are held in flight until the test completes them.
//! Tests pick the completion order explicitly, or let a seeded RNG pick it, so
//! every interleaving of responses is reproducible.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chatmate_app::{App, AppEvent, Driver, KeyInput};
use chatmate_client::{ApiError, ApiRequest, Completion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    backend::FakeBackend,
    invariants::{AppSnapshot, InvariantRegistry},
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Shared state for event injection.
///
/// This allows injection from outside async contexts.
#[derive(Default)]
struct SharedState {
    pending_events: std::collections::VecDeque<AppEvent>,
    in_flight: Vec<ApiRequest>,
    backend: FakeBackend,
    auto_complete: bool,
    renders: usize,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`chatmate_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<InvariantRegistry>,
    rng: ChaCha8Rng,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a simulation driver over an empty backend.
    pub fn new() -> Self {
        Self::with_backend(FakeBackend::new())
    }

    /// Create a simulation driver over a pre-populated backend.
    pub fn with_backend(backend: FakeBackend) -> Self {
        let state = SharedState { backend, ..SharedState::default() };
        Self {
            state: Arc::new(Mutex::new(state)),
            invariants: None,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    /// Seed the RNG used by [`SimDriver::complete_random`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Enable invariant checking after every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Complete every request as soon as it is dispatched.
    #[must_use]
    pub fn auto_complete(self) -> Self {
        self.state().auto_complete = true;
        self
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.state().pending_events.push_back(event);
    }

    /// Inject a key press.
    pub fn inject_key(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Inject one key press per character of `text`.
    pub fn inject_text(&self, text: &str) {
        let mut state = self.state();
        state.pending_events.extend(text.chars().map(|c| AppEvent::Key(KeyInput::Char(c))));
    }

    /// Inject a tick event.
    pub fn inject_tick(&self) {
        self.inject_event(AppEvent::Tick);
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.state().pending_events.is_empty()
    }

    /// Requests dispatched but not yet completed, oldest first.
    pub fn in_flight(&self) -> Vec<ApiRequest> {
        self.state().in_flight.clone()
    }

    /// Answer the in-flight request at `index` from the backend.
    ///
    /// Returns `false` if there is no such request.
    pub fn complete(&self, index: usize) -> bool {
        let mut state = self.state();
        if index >= state.in_flight.len() {
            return false;
        }

        let request = state.in_flight.remove(index);
        let completion = match state.backend.execute(&request) {
            Ok(response) => Completion::ok(request, response),
            Err(error) => Completion::err(request, error),
        };
        state.pending_events.push_back(AppEvent::Completed(completion));
        true
    }

    /// Answer all in-flight requests in dispatch order.
    pub fn complete_all(&self) {
        while self.complete(0) {}
    }

    /// Answer one in-flight request chosen by the seeded RNG.
    ///
    /// Returns `false` if nothing is in flight.
    pub fn complete_random(&mut self) -> bool {
        let len = self.state().in_flight.len();
        if len == 0 {
            return false;
        }
        let index = self.rng.gen_range(0..len);
        self.complete(index)
    }

    /// Fail the in-flight request at `index` without touching the backend.
    ///
    /// Returns `false` if there is no such request.
    pub fn fail(&self, index: usize, error: ApiError) -> bool {
        let mut state = self.state();
        if index >= state.in_flight.len() {
            return false;
        }

        let request = state.in_flight.remove(index);
        state.pending_events.push_back(AppEvent::Completed(Completion::err(request, error)));
        true
    }

    /// Inspect or modify the backend.
    pub fn backend<R>(&self, f: impl FnOnce(&mut FakeBackend) -> R) -> R {
        f(&mut self.state().backend)
    }

    /// Number of frames rendered so far.
    pub fn render_count(&self) -> usize {
        self.state().renders
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App, context: &str) {
        if let Some(ref registry) = self.invariants {
            let snapshot = AppSnapshot::from_app(app);
            registry.assert_all(&snapshot, context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.state().pending_events.pop_front())
    }

    fn dispatch(&mut self, request: ApiRequest) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.in_flight.push(request);
        if state.auto_complete {
            drop(state);
            self.complete_all();
        }
        Ok(())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.state().renders += 1;
        self.check_invariants(app, "after render");
        Ok(())
    }

    fn cancel_requests(&mut self) {
        let mut state = self.state();
        let dropped = state.in_flight.len();
        state.in_flight.clear();
        state.pending_events.retain(|event| !matches!(event, AppEvent::Completed(_)));
        tracing::debug!(dropped, "sim driver cancelled requests");
    }

    fn stop(&mut self) {
        let mut state = self.state();
        let dropped = state.in_flight.len();
        state.in_flight.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "sim driver stopped with requests in flight");
        }
    }
}
