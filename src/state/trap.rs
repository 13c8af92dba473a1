//! Focus Trap - bound Tab cycling to one container (modals, dialogs)
//!
//! Traps nest: each activation pushes a scope and only the top scope reacts
//! to Tab. Native Tab movement inside the scope is left alone; the trap only
//! steps in at the edges:
//!
//! - Tab on the last element wraps to the first
//! - Shift+Tab on the first element wraps to the last
//!
//! Every scope carries a [`TrapId`]. A cleanup removes exactly its own scope,
//! so releasing out of order never pops an unrelated trap.
//!
//! # Example
//!
//! ```ignore
//! let release = trap::activate(&ctx, dialog);
//! // ... dialog open ...
//! release();
//! ```

use std::rc::Rc;

use crate::surface::Surface;
use crate::types::{noop_cleanup, Cleanup, ElementId};

use super::context::FocusContext;
use super::keyboard::{self, KeyboardEvent};
use super::locator;

// =============================================================================
// TRAP STACK
// =============================================================================

/// Unique token of one trap activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrapId(u64);

/// Active trap: container plus its focusable snapshot at activation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrapScope {
    pub id: TrapId,
    pub container: ElementId,
    pub elements: Vec<ElementId>,
}

impl TrapScope {
    pub fn first(&self) -> Option<ElementId> {
        self.elements.first().copied()
    }

    pub fn last(&self) -> Option<ElementId> {
        self.elements.last().copied()
    }
}

/// Stack of nested trap scopes.
#[derive(Debug, Default)]
pub struct TrapStack {
    scopes: Vec<TrapScope>,
    next_id: u64,
}

impl TrapStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new scope - it becomes the enforced one.
    pub fn push(&mut self, container: ElementId, elements: Vec<ElementId>) -> TrapId {
        let id = TrapId(self.next_id);
        self.next_id += 1;
        self.scopes.push(TrapScope {
            id,
            container,
            elements,
        });
        id
    }

    /// The enforced scope.
    pub fn top(&self) -> Option<&TrapScope> {
        self.scopes.last()
    }

    /// Container of the enforced scope.
    pub fn current_container(&self) -> Option<ElementId> {
        self.top().map(|scope| scope.container)
    }

    /// Check if `id` is the enforced scope
    pub fn is_top(&self, id: TrapId) -> bool {
        self.top().is_some_and(|scope| scope.id == id)
    }

    /// Check if any trap is active
    pub fn is_trapped(&self) -> bool {
        !self.scopes.is_empty()
    }

    /// Number of nested scopes
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Remove the scope with this token. Returns false if it was already gone.
    pub fn release(&mut self, id: TrapId) -> bool {
        let Some(position) = self.scopes.iter().position(|scope| scope.id == id) else {
            return false;
        };
        if position + 1 != self.scopes.len() {
            tracing::warn!(
                container = %self.scopes[position].container,
                depth = self.scopes.len(),
                "focus trap released out of order"
            );
        }
        self.scopes.remove(position);
        true
    }
}

// =============================================================================
// ACTIVATION
// =============================================================================

/// Trap focus inside `container`.
///
/// Focuses the first focusable element (recording the previous holder in
/// history) and installs the Tab listener. With no focusable element nothing
/// happens and a no-op cleanup is returned. The cleanup does not restore
/// focus; that is up to the caller.
pub fn activate<S: Surface + 'static>(ctx: &FocusContext<S>, container: ElementId) -> Cleanup {
    let elements = locator::locate(&*ctx.surface.borrow(), container);
    let Some(&first) = elements.first() else {
        tracing::debug!(%container, "focus trap skipped: no focusable elements");
        return noop_cleanup();
    };

    let count = elements.len();
    let id = ctx.traps.borrow_mut().push(container, elements);

    ctx.history.borrow_mut().record_and_focus(
        &mut *ctx.surface.borrow_mut(),
        first,
        true,
        ctx.config.scroll_into_view,
    );

    let traps = Rc::clone(&ctx.traps);
    let surface = Rc::clone(&ctx.surface);
    let scroll = ctx.config.scroll_into_view;
    let remove_listener = keyboard::on_container(&ctx.listeners, container, move |event| {
        let traps = traps.borrow();
        let Some(scope) = traps.top().filter(|scope| scope.id == id) else {
            return false;
        };
        let mut surface = surface.borrow_mut();
        let Some(target) = wrap_target(scope, surface.active_element(), event) else {
            return false;
        };
        surface.focus(target);
        if scroll {
            surface.scroll_into_view(target);
        }
        true
    });

    tracing::debug!(%container, elements = count, "focus trap activated");

    let traps = Rc::clone(&ctx.traps);
    Box::new(move || {
        remove_listener();
        if traps.borrow_mut().release(id) {
            tracing::debug!(%container, "focus trap released");
        }
    })
}

/// Where a Tab press at the edge of `scope` should land, if anywhere.
fn wrap_target(
    scope: &TrapScope,
    active: Option<ElementId>,
    event: &KeyboardEvent,
) -> Option<ElementId> {
    if event.key != "Tab" || event.modifiers.has_command() {
        return None;
    }
    let (first, last) = (scope.first()?, scope.last()?);
    let active = active?;

    if event.modifiers.shift {
        (active == first).then_some(last)
    } else {
        (active == last).then_some(first)
    }
}

// =============================================================================
// TESTS
// =============================================================================
