//! Focusable element locator.
//!
//! Finds the elements of a container that can take keyboard focus right now:
//! an interactive category, and actually rendered. Always recomputed, never
//! cached, since container contents change between calls.

use crate::surface::Surface;
use crate::types::{ElementFlags, ElementId, ElementInfo, ElementKind};

/// Element belongs to one of the interactive categories.
///
/// - navigable links (anchor with href)
/// - enabled form controls
/// - explicit, reachable tab stop (tabindex >= 0)
/// - editable regions
/// - media with native controls
/// - disclosure elements
pub fn is_interactive(info: &ElementInfo) -> bool {
    if info.tab_index.is_some_and(|t| t >= 0) {
        return true;
    }
    if info.flags.contains(ElementFlags::CONTENT_EDITABLE) {
        return true;
    }
    match info.kind {
        ElementKind::Anchor => info.flags.contains(ElementFlags::HREF),
        kind if kind.is_form_control() => !info.flags.contains(ElementFlags::DISABLED),
        kind if kind.is_media() => info.flags.contains(ElementFlags::CONTROLS),
        kind => kind.is_disclosure(),
    }
}

/// Focusable, rendered descendants of `container` in tree order.
///
/// Returns an empty vec when nothing qualifies.
pub fn locate<S: Surface + ?Sized>(surface: &S, container: ElementId) -> Vec<ElementId> {
    surface
        .query_descendants(container, &is_interactive)
        .into_iter()
        .filter(|&id| surface.computed_visibility(id).is_rendered())
        .collect()
}
