//! Input Module - crossterm key conversion
//!
//! Bridges crossterm's key events with our keyboard module so a terminal
//! host can feed real key presses into [`FocusManager::handle_key`].
//!
//! [`FocusManager::handle_key`]: crate::FocusManager::handle_key
//!
//! # Example
//!
//! ```ignore
//! use crossterm::event::{read, Event};
//! use spark_focus::state::input::convert_key_event;
//!
//! if let Event::Key(key) = read()? {
//!     manager.handle_key(&convert_key_event(key));
//! }
//! ```

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers};

use super::keyboard::{KeyState, KeyboardEvent, Modifiers};

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Key name for codes the engine and its hosts care about.
fn key_name(code: KeyCode) -> Option<&'static str> {
    let name = match code {
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        _ => return None,
    };
    Some(name)
}

/// Translate a crossterm key event. Unknown codes produce an empty key,
/// which no focus listener matches.
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let mut modifiers = convert_modifiers(event.modifiers);
    // Terminals report Shift+Tab as its own code
    if event.code == KeyCode::BackTab {
        modifiers.shift = true;
    }

    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        code => key_name(code).unwrap_or_default().to_string(),
    };

    let mut converted = KeyboardEvent::with_modifiers(key, modifiers);
    converted.state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };
    converted
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

/// Super and Meta both count as the meta modifier.
fn convert_modifiers(pressed: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: pressed.contains(KeyModifiers::CONTROL),
        alt: pressed.contains(KeyModifiers::ALT),
        shift: pressed.contains(KeyModifiers::SHIFT),
        meta: pressed.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    }
}

// =============================================================================
// TESTS
// =============================================================================
