//! Surface capability - the engine's only view of the UI tree.
//!
//! The engine never owns elements. Everything it needs (tree queries,
//! computed style, focus, tab stops, live regions) goes through this trait,
//! so it can run against a live rendering surface or the in-memory
//! [`Document`](crate::dom::Document).

use crate::error::Result;
use crate::types::{ComputedVisibility, ElementId, ElementInfo, Politeness};

/// Tree-like surface with computed-style introspection and focus control.
pub trait Surface {
    /// Descendants of `container` (container excluded) matching `predicate`,
    /// in tree order.
    fn query_descendants(
        &self,
        container: ElementId,
        predicate: &dyn Fn(&ElementInfo) -> bool,
    ) -> Vec<ElementId>;

    /// Computed display/visibility and laid-out size of `element`.
    fn computed_visibility(&self, element: ElementId) -> ComputedVisibility;

    /// Parent of `element`, `None` at the root or when detached.
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Element is still part of the live tree.
    fn is_attached(&self, element: ElementId) -> bool;

    /// Root node live regions are attached to, if the surface has one.
    fn document_root(&self) -> Option<ElementId>;

    /// Currently focused element.
    fn active_element(&self) -> Option<ElementId>;

    /// Move input focus to `element`.
    fn focus(&mut self, element: ElementId);

    /// Make sure `element` is inside the visible viewport.
    fn scroll_into_view(&mut self, element: ElementId);

    /// Set the element's tabindex attribute.
    fn set_tab_index(&mut self, element: ElementId, tab_index: i32);

    /// Insert an empty, visually hidden live region under the document root.
    fn create_live_region(&mut self, politeness: Politeness) -> Result<ElementId>;

    /// Replace the text content of `element`.
    fn set_text_content(&mut self, element: ElementId, text: &str);

    /// Detach `element` and its subtree.
    fn remove(&mut self, element: ElementId);

    /// `element` is `container` or one of its descendants.
    fn contains(&self, container: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == container {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Event path for key delivery: the target followed by its ancestors.
    fn ancestors_inclusive(&self, element: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = Some(element);
        while let Some(id) = current {
            path.push(id);
            current = self.parent(id);
        }
        path
    }
}
