use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move cursor up
    Up,
    /// Move cursor down
    Down,
    /// Toggle selection at cursor
    ToggleSelect,
    /// Expand or collapse the node at cursor
    ToggleExpand,
    /// Select or deselect every visible row
    ToggleAll,
    /// Delete the current selection
    Delete,
    /// Confirm deletion
    ConfirmDelete,
    /// Cancel deletion
    CancelDelete,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Navigation
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Down,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Down,

        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ToggleSelect,
        (KeyCode::Tab, KeyModifiers::NONE) => KeyAction::ToggleExpand,
        (KeyCode::Char('e'), KeyModifiers::NONE) => KeyAction::ToggleExpand,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::ToggleAll,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Delete,

        // Help: ?
        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used when ViewState is ConfirmDelete
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::ConfirmDelete,
        (KeyCode::Char('Y'), _) => KeyAction::ConfirmDelete,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::ConfirmDelete,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::CancelDelete,
        (KeyCode::Char('N'), _) => KeyAction::CancelDelete,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::CancelDelete,

        _ => KeyAction::None,
    }
}
