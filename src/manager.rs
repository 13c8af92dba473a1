//! Focus Manager - the facade UI code talks to.
//!
//! One manager per surface, constructed by the application and passed by
//! reference. It owns the surface (behind `Rc<RefCell<_>>`, so cleanups can
//! reach it later) and wires the controllers together:
//!
//! ```ignore
//! let clock = Rc::new(VirtualClock::new());
//! let focus = FocusManager::new(document, clock.clone(), FocusConfig::default());
//!
//! let release = focus.trap_focus(dialog);
//! focus.handle_key(&KeyboardEvent::tab());
//! release();
//! focus.return_focus();
//! ```

use std::cell::{Ref, RefMut};
use std::rc::Rc;

use crate::config::FocusConfig;
use crate::error::Result;
use crate::state::{
    keyboard, locator, roving, trap, Announcer, FocusContext, KeyboardEvent, RovingOptions,
    Scheduler,
};
use crate::surface::Surface;
use crate::types::{Cleanup, ElementId, Politeness};

/// Focus-management engine for one surface.
pub struct FocusManager<S: Surface + 'static> {
    ctx: FocusContext<S>,
    announcer: Announcer<S>,
}

impl<S: Surface + 'static> FocusManager<S> {
    pub fn new(surface: S, scheduler: Rc<dyn Scheduler>, config: FocusConfig) -> Self {
        let announce_delay = config.announce_delay();
        let display_window = config.display_window();
        let ctx = FocusContext::new(surface, config);
        let announcer = Announcer::new(
            Rc::clone(&ctx.surface),
            scheduler,
            announce_delay,
            display_window,
        );
        Self { ctx, announcer }
    }

    pub fn config(&self) -> &FocusConfig {
        &self.ctx.config
    }

    /// Borrow the surface.
    pub fn surface(&self) -> Ref<'_, S> {
        self.ctx.surface.borrow()
    }

    /// Borrow the surface mutably, e.g. to change the tree.
    pub fn surface_mut(&self) -> RefMut<'_, S> {
        self.ctx.surface.borrow_mut()
    }

    // -------------------------------------------------------------------------
    // Locator
    // -------------------------------------------------------------------------

    /// Focusable, rendered descendants of `container` in tree order.
    pub fn get_focusable_elements(&self, container: ElementId) -> Vec<ElementId> {
        locator::locate(&*self.ctx.surface.borrow(), container)
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Focus `element`, optionally recording the current holder first.
    pub fn set_focus(&self, element: ElementId, add_to_history: bool) {
        self.ctx.history.borrow_mut().record_and_focus(
            &mut *self.ctx.surface.borrow_mut(),
            element,
            add_to_history,
            self.ctx.config.scroll_into_view,
        );
    }

    /// Pop one history entry and focus it if still attached.
    pub fn return_focus(&self) -> bool {
        self.ctx
            .history
            .borrow_mut()
            .restore(&mut *self.ctx.surface.borrow_mut())
    }

    pub fn clear_history(&self) {
        self.ctx.history.borrow_mut().clear();
    }

    pub fn history_len(&self) -> usize {
        self.ctx.history.borrow().len()
    }

    // -------------------------------------------------------------------------
    // Trap
    // -------------------------------------------------------------------------

    /// Confine Tab cycling to `container`. Call the cleanup exactly when the
    /// container closes.
    pub fn trap_focus(&self, container: ElementId) -> Cleanup {
        trap::activate(&self.ctx, container)
    }

    /// Container of the enforced trap.
    pub fn current_trap(&self) -> Option<ElementId> {
        self.ctx.traps.borrow().current_container()
    }

    pub fn trap_depth(&self) -> usize {
        self.ctx.traps.borrow().depth()
    }

    // -------------------------------------------------------------------------
    // Roving
    // -------------------------------------------------------------------------

    pub fn create_roving_tabindex(&self, container: ElementId, options: RovingOptions) -> Cleanup {
        roving::activate(&self.ctx, container, options)
    }

    // -------------------------------------------------------------------------
    // Announcer
    // -------------------------------------------------------------------------

    pub fn announce(&self, message: &str, politeness: Politeness) -> Result<()> {
        self.announcer.announce(message, politeness)
    }

    // -------------------------------------------------------------------------
    // Key delivery
    // -------------------------------------------------------------------------

    /// Deliver a key event. Returns true when the engine handled it and the
    /// host must skip the key's default action.
    ///
    /// The event targets the focused element, or the document root when
    /// nothing has focus, and bubbles up through its ancestors.
    pub fn handle_key(&self, event: &KeyboardEvent) -> bool {
        let path = {
            let surface = self.ctx.surface.borrow();
            match surface.active_element().or_else(|| surface.document_root()) {
                Some(target) => surface.ancestors_inclusive(target),
                None => return false,
            }
        };
        keyboard::dispatch(&self.ctx.listeners, &path, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};
    use crate::state::VirtualClock;

    #[test]
    fn test_set_focus_and_return() {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        let a = doc.append(root, Element::button("a")).unwrap();
        let b = doc.append(root, Element::button("b")).unwrap();

        let focus = FocusManager::new(doc, Rc::new(VirtualClock::new()), FocusConfig::default());
        focus.set_focus(a, false);
        focus.set_focus(b, true);
        assert_eq!(focus.history_len(), 1);

        assert!(focus.return_focus());
        assert_eq!(focus.surface().active_element(), Some(a));
        assert!(!focus.return_focus());
    }

    #[test]
    fn test_clear_history() {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        let a = doc.append(root, Element::button("a")).unwrap();
        let b = doc.append(root, Element::button("b")).unwrap();

        let focus = FocusManager::new(doc, Rc::new(VirtualClock::new()), FocusConfig::default());
        focus.set_focus(a, false);
        focus.set_focus(b, true);
        focus.clear_history();
        assert!(!focus.return_focus());
        assert_eq!(focus.surface().active_element(), Some(b));
    }

    #[test]
    fn test_scroll_into_view_follows_config() {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        let a = doc.append(root, Element::button("a")).unwrap();

        let config = FocusConfig {
            scroll_into_view: false,
            ..Default::default()
        };
        let focus = FocusManager::new(doc, Rc::new(VirtualClock::new()), config);
        focus.set_focus(a, true);
        assert_eq!(focus.surface().active_element(), Some(a));
        assert_eq!(focus.surface().last_scrolled(), None);
    }

    #[test]
    fn test_handle_key_without_listeners() {
        let focus = FocusManager::new(Document::new(), Rc::new(VirtualClock::new()), FocusConfig::default());
        assert!(!focus.handle_key(&KeyboardEvent::tab()));

        let headless = FocusManager::new(
            Document::headless(),
            Rc::new(VirtualClock::new()),
            FocusConfig::default(),
        );
        assert!(!headless.handle_key(&KeyboardEvent::tab()));
    }
}
