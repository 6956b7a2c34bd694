//! Input handling for the TUI.
//!
//! This module handles keyboard input and translates it into application actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Actions that can be performed based on user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Quit the application
    Quit,
    /// Switch between windowed and full-screen layout
    ToggleFullScreen,
    /// Toggle help panel
    ToggleHelp,
    /// No action
    None,
}

/// Map a key event to an application action
pub fn map_key_to_action(key_event: KeyEvent) -> InputAction {
    if key_event.kind == KeyEventKind::Release {
        return InputAction::None;
    }

    match key_event.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => InputAction::Quit,
        KeyCode::Esc => InputAction::Quit,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::Quit
        }

        // Full screen
        KeyCode::F(11) if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::ToggleFullScreen
        }
        KeyCode::Char('f') | KeyCode::Char('F') => InputAction::ToggleFullScreen,

        // Help
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
            InputAction::ToggleHelp
        }

        _ => InputAction::None,
    }
}
