//! Keyboard Module - Key event types and container listener registry
//!
//! Listeners are attached to containers, like DOM keydown listeners. A key
//! event is delivered along its event path (focused element first, then each
//! ancestor) until a listener consumes it.
//!
//! # API
//!
//! - `on_container(listeners, container, fn)` - Listen for keys bubbling through a container
//! - `dispatch(listeners, path, event)` - Deliver an event along an event path
//!
//! # Example
//!
//! ```ignore
//! let cleanup = keyboard::on_container(&listeners, toolbar, |event| {
//!     event.key == "ArrowRight" // consume ArrowRight
//! });
//!
//! let consumed = keyboard::dispatch(&listeners, &path, &KeyboardEvent::new("ArrowRight"));
//! cleanup();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// Modifier keys held during a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Ctrl, Alt or Meta is held. Shift alone does not count.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Press, repeat or release. Only presses reach listeners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A key event, named the way the DOM names keys ("Tab", "ArrowUp", "a").
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a plain key press
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_modifiers(key, Modifiers::none())
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Tab press
    pub fn tab() -> Self {
        Self::new("Tab")
    }

    /// Shift+Tab press
    pub fn shift_tab() -> Self {
        Self::with_modifiers("Tab", Modifiers::shift())
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}

/// Handler for keyboard events. Return true to consume the event
/// (prevent the default action and stop bubbling).
pub type KeyHandler = Box<dyn Fn(&KeyboardEvent) -> bool>;

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

/// Key listeners per container.
pub struct KeyListeners {
    container_handlers: HashMap<ElementId, Vec<(usize, KeyHandler)>>,
    next_id: usize,
}

impl Default for KeyListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyListeners {
    pub fn new() -> Self {
        Self {
            container_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of installed listeners.
    pub fn len(&self) -> usize {
        self.container_handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.container_handlers.is_empty()
    }

    /// Containers with at least one listener.
    pub fn has_listener(&self, container: ElementId) -> bool {
        self.container_handlers.contains_key(&container)
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Listen for key events bubbling through `container`.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on_container<F>(
    listeners: &Rc<RefCell<KeyListeners>>,
    container: ElementId,
    handler: F,
) -> impl FnOnce() + 'static
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = {
        let mut reg = listeners.borrow_mut();
        let id = reg.next_id();
        reg.container_handlers
            .entry(container)
            .or_default()
            .push((id, Box::new(handler)));
        id
    };

    let listeners = Rc::clone(listeners);
    move || {
        let mut reg = listeners.borrow_mut();
        if let Some(handlers) = reg.container_handlers.get_mut(&container) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                reg.container_handlers.remove(&container);
            }
        }
    }
}

/// Deliver an event along `path` (target first, then ancestors).
/// Returns true if a listener consumed the event.
///
/// Only press events are delivered. Handlers must not add or remove
/// listeners while running.
pub fn dispatch(listeners: &RefCell<KeyListeners>, path: &[ElementId], event: &KeyboardEvent) -> bool {
    if !event.is_press() {
        return false;
    }

    let reg = listeners.borrow();
    for element in path {
        if let Some(handlers) = reg.container_handlers.get(element) {
            for (_, handler) in handlers {
                if handler(event) {
                    tracing::trace!(key = %event.key, %element, "key event consumed");
                    return true;
                }
            }
        }
    }
    false
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn id(index: u32) -> ElementId {
        ElementId::new(index, 0)
    }

    fn setup() -> Rc<RefCell<KeyListeners>> {
        Rc::new(RefCell::new(KeyListeners::new()))
    }

    #[test]
    fn test_listener_on_path_receives_event() {
        let listeners = setup();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup = on_container(&listeners, id(1), move |_event| {
            count_clone.set(count_clone.get() + 1);
            false
        });

        // Container is an ancestor of the target
        dispatch(&listeners, &[id(3), id(1), id(0)], &KeyboardEvent::new("a"));
        assert_eq!(count.get(), 1);

        // Container not on the path
        dispatch(&listeners, &[id(4), id(0)], &KeyboardEvent::new("a"));
        assert_eq!(count.get(), 1);

        cleanup();
        dispatch(&listeners, &[id(3), id(1), id(0)], &KeyboardEvent::new("a"));
        assert_eq!(count.get(), 1);
        assert!(listeners.borrow().is_empty());
    }

    #[test]
    fn test_consumption_stops_bubbling() {
        let listeners = setup();
        let reached = Rc::new(Cell::new(false));
        let reached_clone = reached.clone();

        let _inner = on_container(&listeners, id(2), |event| event.key == "Enter");
        let _outer = on_container(&listeners, id(1), move |_| {
            reached_clone.set(true);
            false
        });

        let consumed = dispatch(&listeners, &[id(2), id(1)], &KeyboardEvent::new("Enter"));
        assert!(consumed);
        assert!(!reached.get());

        let consumed = dispatch(&listeners, &[id(2), id(1)], &KeyboardEvent::new("x"));
        assert!(!consumed);
        assert!(reached.get());
    }

    #[test]
    fn test_only_press_dispatched() {
        let listeners = setup();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let _cleanup = on_container(&listeners, id(1), move |_| {
            count_clone.set(count_clone.get() + 1);
            false
        });

        dispatch(&listeners, &[id(1)], &KeyboardEvent::new("a"));
        assert_eq!(count.get(), 1);

        let mut repeat = KeyboardEvent::new("a");
        repeat.state = KeyState::Repeat;
        dispatch(&listeners, &[id(1)], &repeat);
        assert_eq!(count.get(), 1);

        let mut release = KeyboardEvent::new("a");
        release.state = KeyState::Release;
        dispatch(&listeners, &[id(1)], &release);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cleanup_removes_only_its_listener() {
        let listeners = setup();
        let first = on_container(&listeners, id(1), |_| false);
        let _second = on_container(&listeners, id(1), |_| false);
        assert_eq!(listeners.borrow().len(), 2);

        first();
        assert_eq!(listeners.borrow().len(), 1);
        assert!(listeners.borrow().has_listener(id(1)));
    }

    #[test]
    fn test_modifiers() {
        assert!(Modifiers::ctrl().has_command());
        assert!(Modifiers::alt().has_command());
        assert!(!Modifiers::shift().has_command());
        assert!(KeyboardEvent::shift_tab().modifiers.shift);
    }
}
