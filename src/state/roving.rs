//! Roving Tabindex - one tab stop per widget group (toolbars, menus, tabs)
//!
//! Exactly one member of the group is reachable with Tab (tabindex 0); every
//! other member is demoted to tabindex -1 and reached with the arrow keys:
//!
//! - ArrowRight / ArrowDown: next member (axis permitting)
//! - ArrowLeft / ArrowUp: previous member (axis permitting)
//! - Home / End: first / last member
//!
//! Members are snapshotted at activation and not rescanned per key press.

use std::cell::RefCell;
use std::rc::Rc;

use crate::surface::Surface;
use crate::types::{noop_cleanup, Cleanup, ElementId, Orientation};

use super::context::FocusContext;
use super::keyboard;
use super::locator;

/// Roving group options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RovingOptions {
    pub orientation: Orientation,
    /// Wrap past either end instead of stopping.
    pub wrap: bool,
    /// Member that starts as the tab stop. Clamped into range.
    pub initial_index: usize,
}

impl Default for RovingOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            wrap: true,
            initial_index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next,
    Previous,
    First,
    Last,
}

/// Group state: member snapshot and the current tab stop.
#[derive(Debug, Clone, PartialEq)]
pub struct RovingGroup {
    container: ElementId,
    members: Vec<ElementId>,
    current: usize,
    orientation: Orientation,
    wrap: bool,
}

impl RovingGroup {
    /// Group over non-empty `members`; `None` when there are none.
    pub fn new(container: ElementId, members: Vec<ElementId>, options: RovingOptions) -> Option<Self> {
        let last = members.len().checked_sub(1)?;
        Some(Self {
            container,
            members,
            current: options.initial_index.min(last),
            orientation: options.orientation,
            wrap: options.wrap,
        })
    }

    /// Container the group was built from.
    pub fn container(&self) -> ElementId {
        self.container
    }

    /// Members in tree order. Never empty.
    pub fn members(&self) -> &[ElementId] {
        &self.members
    }

    /// Index of the tab stop.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Member currently holding the tab stop.
    pub fn current_member(&self) -> ElementId {
        self.members[self.current]
    }

    fn step_for(&self, key: &str) -> Option<Step> {
        match key {
            "ArrowRight" if self.orientation.horizontal() => Some(Step::Next),
            "ArrowLeft" if self.orientation.horizontal() => Some(Step::Previous),
            "ArrowDown" if self.orientation.vertical() => Some(Step::Next),
            "ArrowUp" if self.orientation.vertical() => Some(Step::Previous),
            "Home" => Some(Step::First),
            "End" => Some(Step::Last),
            _ => None,
        }
    }

    /// Index `key` navigates to, or `None` if the key is not handled by this
    /// group. At a boundary without wrap this is the current index.
    pub fn target_index(&self, key: &str) -> Option<usize> {
        let last = self.members.len() - 1;
        let index = match self.step_for(key)? {
            Step::First => 0,
            Step::Last => last,
            Step::Next if self.current < last => self.current + 1,
            Step::Next if self.wrap => 0,
            Step::Next => last,
            Step::Previous if self.current > 0 => self.current - 1,
            Step::Previous if self.wrap => last,
            Step::Previous => 0,
        };
        Some(index)
    }
}

/// Make `container`'s focusable members a roving group.
///
/// Returns a cleanup that makes every member a natural tab stop again and
/// removes the key listener. With no members it is a no-op.
pub fn activate<S: Surface + 'static>(
    ctx: &FocusContext<S>,
    container: ElementId,
    options: RovingOptions,
) -> Cleanup {
    let members = locator::locate(&*ctx.surface.borrow(), container);
    let Some(group) = RovingGroup::new(container, members, options) else {
        tracing::debug!(%container, "roving tabindex skipped: no members");
        return noop_cleanup();
    };

    {
        let mut surface = ctx.surface.borrow_mut();
        for (i, &member) in group.members.iter().enumerate() {
            surface.set_tab_index(member, if i == group.current { 0 } else { -1 });
        }
    }
    tracing::debug!(
        %container,
        members = group.members.len(),
        current = group.current,
        "roving tabindex activated"
    );

    let group = Rc::new(RefCell::new(group));

    let handler_group = Rc::clone(&group);
    let surface = Rc::clone(&ctx.surface);
    let scroll = ctx.config.scroll_into_view;
    let remove_listener = keyboard::on_container(&ctx.listeners, container, move |event| {
        let mut group = handler_group.borrow_mut();
        let Some(next) = group.target_index(&event.key) else {
            return false;
        };
        if next != group.current {
            let previous = group.current_member();
            group.current = next;
            let promoted = group.current_member();

            let mut surface = surface.borrow_mut();
            surface.set_tab_index(previous, -1);
            surface.set_tab_index(promoted, 0);
            surface.focus(promoted);
            if scroll {
                surface.scroll_into_view(promoted);
            }
        }
        true
    });

    let surface = Rc::clone(&ctx.surface);
    Box::new(move || {
        remove_listener();
        let group = group.borrow();
        let mut surface = surface.borrow_mut();
        for &member in &group.members {
            surface.set_tab_index(member, 0);
        }
        tracing::debug!(container = %group.container, "roving tabindex released");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FocusConfig;
    use crate::dom::{Document, Element};
    use crate::state::keyboard::KeyboardEvent;

    fn group(len: u32, current: usize, orientation: Orientation, wrap: bool) -> RovingGroup {
        let members = (1..=len).map(|i| ElementId::new(i, 0)).collect();
        RovingGroup::new(
            ElementId::new(0, 0),
            members,
            RovingOptions {
                orientation,
                wrap,
                initial_index: current,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_empty_group() {
        assert!(RovingGroup::new(ElementId::new(0, 0), Vec::new(), RovingOptions::default()).is_none());
    }

    #[test]
    fn test_initial_index_clamped() {
        let g = group(3, 10, Orientation::Horizontal, true);
        assert_eq!(g.current(), 2);
        assert_eq!(g.current_member(), g.members()[2]);
    }

    #[test]
    fn test_horizontal_keys() {
        let g = group(3, 1, Orientation::Horizontal, true);
        assert_eq!(g.target_index("ArrowRight"), Some(2));
        assert_eq!(g.target_index("ArrowLeft"), Some(0));
        assert_eq!(g.target_index("ArrowDown"), None);
        assert_eq!(g.target_index("ArrowUp"), None);
        assert_eq!(g.target_index("Home"), Some(0));
        assert_eq!(g.target_index("End"), Some(2));
        assert_eq!(g.target_index("Enter"), None);
    }

    #[test]
    fn test_vertical_keys() {
        let g = group(3, 1, Orientation::Vertical, true);
        assert_eq!(g.target_index("ArrowDown"), Some(2));
        assert_eq!(g.target_index("ArrowUp"), Some(0));
        assert_eq!(g.target_index("ArrowRight"), None);
    }

    #[test]
    fn test_both_axes() {
        let g = group(3, 0, Orientation::Both, false);
        assert_eq!(g.target_index("ArrowRight"), Some(1));
        assert_eq!(g.target_index("ArrowDown"), Some(1));
    }

    #[test]
    fn test_wrap_at_boundaries() {
        let g = group(3, 2, Orientation::Horizontal, true);
        assert_eq!(g.target_index("ArrowRight"), Some(0));
        let g = group(3, 0, Orientation::Horizontal, true);
        assert_eq!(g.target_index("ArrowLeft"), Some(2));
    }

    #[test]
    fn test_clamp_at_boundaries() {
        let g = group(3, 2, Orientation::Both, false);
        assert_eq!(g.target_index("ArrowRight"), Some(2));
        assert_eq!(g.target_index("ArrowDown"), Some(2));
        let g = group(3, 0, Orientation::Both, false);
        assert_eq!(g.target_index("ArrowLeft"), Some(0));
    }

    #[test]
    fn test_activate_empty_container_is_noop() {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        let opener = doc.append(root, Element::button("open")).unwrap();
        let empty = doc.append(root, Element::container().text("no members")).unwrap();
        doc.focus(opener);

        let ctx = FocusContext::new(doc, FocusConfig::default());
        let release = activate(&ctx, empty, RovingOptions::default());

        assert_eq!(ctx.surface.borrow().active_element(), Some(opener));
        assert_eq!(ctx.surface.borrow().tab_index(opener), None);
        assert!(ctx.listeners.borrow().is_empty());
        release();
        assert!(ctx.listeners.borrow().is_empty());
    }

    #[test]
    fn test_navigation_scrolls_when_configured() {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        let bar = doc.append(root, Element::container()).unwrap();
        let first = doc.append(bar, Element::button("first")).unwrap();
        let second = doc.append(bar, Element::button("second")).unwrap();
        doc.focus(first);

        let ctx = FocusContext::new(doc, FocusConfig::default());
        let _release = activate(&ctx, bar, RovingOptions::default());
        keyboard::dispatch(&ctx.listeners, &[first, bar, root], &KeyboardEvent::new("ArrowRight"));

        assert_eq!(ctx.surface.borrow().active_element(), Some(second));
        assert_eq!(ctx.surface.borrow().last_scrolled(), Some(second));
    }

    #[test]
    fn test_navigation_without_scroll() {
        let mut doc = Document::new();
        let root = doc.root().unwrap();
        let bar = doc.append(root, Element::container()).unwrap();
        let first = doc.append(bar, Element::button("first")).unwrap();
        let second = doc.append(bar, Element::button("second")).unwrap();
        doc.focus(first);

        let config = FocusConfig {
            scroll_into_view: false,
            ..Default::default()
        };
        let ctx = FocusContext::new(doc, config);
        let _release = activate(&ctx, bar, RovingOptions::default());
        keyboard::dispatch(&ctx.listeners, &[first, bar, root], &KeyboardEvent::new("End"));

        assert_eq!(ctx.surface.borrow().active_element(), Some(second));
        assert_eq!(ctx.surface.borrow().last_scrolled(), None);
    }
}
