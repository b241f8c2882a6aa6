//! Application controller.
//!
//! This module orchestrates the main application loop:
//! - Terminal setup and restore through `TerminalGuard`
//! - Event polling and handling
//! - State updates and rendering
//!
//! Everything runs on one thread; an event is fully applied, including any
//! layout rebuild, before the next frame is drawn.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{debug, info};

use crate::event::{apply_action, handle_event, poll_event, Action};
use crate::state::AppState;
use crate::terminal::TerminalGuard;
use crate::ui::{diagram_inner_area, render};

/// The main application controller.
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Restores the terminal when the app is dropped or panics
    _guard: TerminalGuard,
    /// Application state
    state: AppState,
    /// Event poll timeout
    tick_rate: Duration,
}

impl App {
    /// Creates a new application with the given state.
    pub fn new(state: AppState) -> Result<Self> {
        // Setup terminal
        let guard = TerminalGuard::new()?;
        guard.install_panic_hook();
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            _guard: guard,
            state,
            tick_rate: Duration::from_millis(50),
        })
    }

    /// Runs the main application loop.
    pub fn run(&mut self) -> Result<()> {
        // Initial viewport setup
        self.update_viewport_size()?;
        info!(sentences = self.state.sentence_count(), "viewer started");

        loop {
            // Render
            self.terminal.draw(|frame| {
                render(frame, &self.state);
            })?;

            // Handle events
            if let Some(event) = poll_event(self.tick_rate) {
                let action = handle_event(event, &self.state.mode, self.state.show_help);

                // Handle resize specially to update viewport
                if let Action::Resize(width, height) = action {
                    debug!(width, height, "terminal resized");
                    self.update_viewport_size()?;
                }

                if !apply_action(&mut self.state, action) {
                    break;
                }
            }
        }

        info!("viewer closed");
        Ok(())
    }

    /// Updates the viewport position and size based on terminal dimensions.
    fn update_viewport_size(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        let inner = diagram_inner_area(Rect::new(0, 0, size.width, size.height));
        self.state
            .update_viewport(inner.x, inner.y, inner.height as usize, inner.width as usize);
        Ok(())
    }
}

/// Convenience function to run the viewer on a loaded document.
pub fn run_app(state: AppState) -> Result<()> {
    let mut app = App::new(state)?;
    app.run()
}
