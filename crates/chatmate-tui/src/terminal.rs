//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Requests run on spawned tokio
//! tasks through the reqwest transport and report back over a channel.

use std::io::{self, Stdout, stdout};

use chatmate_app::{App, AppEvent, Driver, KeyInput};
use chatmate_client::{
    ApiError, ApiRequest, Completion,
    transport::{HttpTransport, TransportConfig},
};
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinSet};

use crate::ui;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport could not be configured.
    #[error("transport error: {0}")]
    Transport(#[from] ApiError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and HTTP requests
/// (reqwest on tokio tasks). Completions arrive in whatever order the backend
/// answers.
///
/// Every request is tagged with the generation it was dispatched in.
/// [`Driver::cancel_requests`] bumps the generation, so completions already
/// queued on the channel by a task that outran the abort are dropped too.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    transport: HttpTransport,
    completions_tx: mpsc::UnboundedSender<(u64, Completion)>,
    completions_rx: mpsc::UnboundedReceiver<(u64, Completion)>,
    requests: JoinSet<()>,
    generation: u64,
}

impl TerminalDriver {
    /// Create a new terminal driver and take over the terminal.
    pub fn new(config: &TransportConfig) -> Result<Self, TerminalError> {
        let transport = HttpTransport::new(config)?;

        enable_raw_mode()?;
        let terminal = restore_on_error(Self::enter_terminal, restore_terminal)?;
        let event_stream = EventStream::new();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            event_stream,
            transport,
            completions_tx,
            completions_rx,
            requests: JoinSet::new(),
            generation: 0,
        })
    }

    fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
        stdout().execute(EnterAlternateScreen)?;
        Terminal::new(CrosstermBackend::new(stdout()))
    }

    /// Convert a crossterm key event to `KeyInput`.
    fn convert_key(event: KeyEvent) -> Option<KeyInput> {
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(KeyInput::Interrupt);
        }

        match event.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let timeout = tokio::time::Duration::from_millis(100);

        tokio::select! {
            biased;

            // Finished requests
            Some((generation, completion)) = self.completions_rx.recv() => {
                if generation == self.generation {
                    Ok(Some(AppEvent::Completed(completion)))
                } else {
                    tracing::debug!(path = %completion.request.endpoint(), "dropping cancelled completion");
                    Ok(None)
                }
            }

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        Ok(Self::convert_key(key_event).map(AppEvent::Key))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(None),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(timeout) => {
                Ok(Some(AppEvent::Tick))
            }
        }
    }

    fn dispatch(&mut self, request: ApiRequest) -> Result<(), Self::Error> {
        while self.requests.try_join_next().is_some() {}

        let transport = self.transport.clone();
        let completions = self.completions_tx.clone();
        let generation = self.generation;
        self.requests.spawn(async move {
            let result = transport.execute(&request).await;
            if completions.send((generation, Completion { request, result })).is_err() {
                tracing::debug!("completion dropped after shutdown");
            }
        });
        Ok(())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn cancel_requests(&mut self) {
        self.requests.abort_all();
        self.generation = self.generation.wrapping_add(1);
    }

    fn stop(&mut self) {
        self.requests.abort_all();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        restore_terminal();
    }
}

/// Leave raw mode and the alternate screen, ignoring failures.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}

/// Run a setup step, undoing earlier terminal changes if it fails.
fn restore_on_error<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    setup().inspect_err(|_| restore())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_keys_convert() {
        assert_eq!(TerminalDriver::convert_key(key(KeyCode::Char('x'))), Some(KeyInput::Char('x')));
        assert_eq!(TerminalDriver::convert_key(key(KeyCode::Up)), Some(KeyInput::Up));
        assert_eq!(TerminalDriver::convert_key(key(KeyCode::F(1))), None);
    }

    #[test]
    fn ctrl_c_interrupts() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(TerminalDriver::convert_key(ctrl_c), Some(KeyInput::Interrupt));
        assert_eq!(TerminalDriver::convert_key(key(KeyCode::Char('c'))), Some(KeyInput::Char('c')));
    }

    #[test]
    fn failed_setup_restores_terminal() {
        let mut restored = false;

        let result: io::Result<()> =
            restore_on_error(|| Err(io::Error::other("no tty")), || restored = true);

        assert!(result.is_err());
        assert!(restored);
    }

    #[test]
    fn successful_setup_keeps_terminal() {
        let mut restored = false;

        let result = restore_on_error(|| Ok(7), || restored = true);

        assert_eq!(result.ok(), Some(7));
        assert!(!restored);
    }
}
