//! Keyboard and mouse event handling.
//!
//! Normal mode:
//! - `h`/`l` or `Left`/`Right`: scroll left/right
//! - `j`/`k` or `Down`/`Up`, mouse wheel: scroll down/up
//! - `n`/`p`: next/previous sentence
//! - left click: select the label or arc under the pointer
//! - `Esc`: clear the selection
//! - `a`: add a dependency (`LABEL HEAD [DEPENDENT]`)
//! - `d`, `x` or `Delete`: remove the selected dependency
//! - `?`: show help
//! - `:`: enter command mode
//!   - `:q`, `:q!`, `:w [PATH]`, `:wq`
//!   - `:n`, `:p`, `:<number>`: sentence navigation
//!   - `:add LABEL HEAD [DEPENDENT]`, `:rm`
//!   - `:h` or `:help`: show help

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Duration;

use crate::state::{AppMode, AppState};

/// Actions that can be triggered by keyboard or mouse input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (input not recognized)
    None,
    /// Quit the application
    Quit,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    NextSentence,
    PreviousSentence,
    /// Left click at a screen position
    Click(u16, u16),
    ClearSelection,
    RemoveSelected,
    /// Open the add-dependency prompt
    EnterAddMode,
    /// Enter command mode
    EnterCommandMode,
    /// Add character to the command line or prompt
    InputChar(char),
    /// Backspace in the command line or prompt
    InputBackspace,
    /// Submit the command line or prompt
    SubmitInput,
    /// Leave the command line or prompt
    CancelInput,
    ShowHelp,
    /// Dismiss the help overlay
    DismissHelp,
    /// Resize event (terminal resized)
    Resize(u16, u16),
}

/// Polls for terminal events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on current app mode.
pub fn handle_event(event: Event, mode: &AppMode, show_help: bool) -> Action {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, mode, show_help),
        Event::Mouse(mouse_event) => handle_mouse_event(mouse_event, mode, show_help),
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

/// Handles a key event based on the current application mode.
fn handle_key_event(key: KeyEvent, mode: &AppMode, show_help: bool) -> Action {
    // If help is shown, any key dismisses it
    if show_help {
        return Action::DismissHelp;
    }

    match mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Command(_) | AppMode::AddDependency(_) => handle_input_mode(key),
    }
}

/// Handles mouse events; clicks only count in normal mode.
fn handle_mouse_event(mouse: MouseEvent, mode: &AppMode, show_help: bool) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if show_help => Action::DismissHelp,
        MouseEventKind::Down(MouseButton::Left) if *mode == AppMode::Normal => Action::Click(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => Action::ScrollUp,
        MouseEventKind::ScrollDown => Action::ScrollDown,
        MouseEventKind::ScrollLeft => Action::ScrollLeft,
        MouseEventKind::ScrollRight => Action::ScrollRight,
        _ => Action::None,
    }
}

/// Handles key events in normal mode.
fn handle_normal_mode(key: KeyEvent) -> Action {
    // Handle Ctrl+C for emergency quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::ScrollLeft,
        KeyCode::Char('l') | KeyCode::Right => Action::ScrollRight,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,

        KeyCode::Char('n') | KeyCode::PageDown => Action::NextSentence,
        KeyCode::Char('p') | KeyCode::PageUp => Action::PreviousSentence,

        KeyCode::Esc => Action::ClearSelection,
        KeyCode::Char('a') => Action::EnterAddMode,
        KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => Action::RemoveSelected,

        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Char(':') => Action::EnterCommandMode,

        _ => Action::None,
    }
}

/// Handles key events in command mode and in the add prompt.
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::SubmitInput,
        KeyCode::Esc => Action::CancelInput,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
///
/// Returns `true` if the application should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ScrollUp => state.scroll_up(),
        Action::ScrollDown => state.scroll_down(),
        Action::ScrollLeft => state.scroll_left(),
        Action::ScrollRight => state.scroll_right(),
        Action::NextSentence => state.next_sentence(),
        Action::PreviousSentence => state.previous_sentence(),
        Action::Click(column, row) => state.click(column, row),
        Action::ClearSelection => state.clear_selection(),
        Action::RemoveSelected => state.remove_selected(),
        Action::EnterAddMode => state.enter_add_mode(),
        Action::EnterCommandMode => state.enter_command_mode(),
        Action::InputChar(c) => state.input_char(c),
        Action::InputBackspace => state.input_backspace(),
        Action::SubmitInput => state.submit_input(),
        Action::CancelInput => state.cancel_input(),
        Action::ShowHelp => state.show_help(),
        Action::DismissHelp => state.dismiss_help(),
        Action::Resize(_, _) => {
            // Resize is handled in the main loop with actual terminal dimensions
        }
    }

    !state.should_quit
}
