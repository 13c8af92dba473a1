//! In-memory document - the reference [`Surface`].
//!
//! Elements live in a generational arena:
//! - Free slot pool for O(1) reuse
//! - Generation bump on release, so stale handles stay stale
//! - Parent/children links for tree order and event paths
//!
//! Focus is held in a spark-signals `Signal`, so UI code can derive from it
//! the same way it derives from any other reactive state.

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{signal, Signal};

use crate::error::{FocusError, Result};
use crate::state::locator;
use crate::surface::Surface;
use crate::types::{
    ComputedVisibility, Display, ElementFlags, ElementId, ElementInfo, ElementKind, Politeness,
    Visibility,
};

use super::layout::{self, LayoutSizes};

// =============================================================================
// Element Description
// =============================================================================

/// Style properties the engine cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyle {
    pub display: Display,
    pub visibility: Visibility,
    /// Explicit width in cells, auto when `None`.
    pub width: Option<f32>,
    /// Explicit height in cells, auto when `None`.
    pub height: Option<f32>,
    /// Taken out of flow (live regions).
    pub absolute: bool,
}

/// Description of an element to insert.
///
/// ```ignore
/// let ok = doc.append(dialog, Element::button("OK"))?;
/// let hidden = doc.append(dialog, Element::button("Later").display(Display::None))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub kind: ElementKind,
    pub flags: ElementFlags,
    pub tab_index: Option<i32>,
    pub text: String,
    pub style: ElementStyle,
    pub attributes: HashMap<String, String>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Plain container.
    pub fn container() -> Self {
        Self::new(ElementKind::Generic)
    }

    pub fn button(label: &str) -> Self {
        Self::new(ElementKind::Button).text(label)
    }

    /// Anchor with an href.
    pub fn link(label: &str) -> Self {
        Self::new(ElementKind::Anchor)
            .text(label)
            .flags(ElementFlags::HREF)
    }

    pub fn input() -> Self {
        Self::new(ElementKind::Input)
    }

    pub fn flags(mut self, flags: ElementFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn disabled(self) -> Self {
        self.flags(ElementFlags::DISABLED)
    }

    pub fn tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.style.display = display;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.style.visibility = visibility;
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.style.width = Some(width);
        self.style.height = Some(height);
        self
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

/// Stored element.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub kind: ElementKind,
    pub flags: ElementFlags,
    pub tab_index: Option<i32>,
    pub text: String,
    pub style: ElementStyle,
    pub attributes: HashMap<String, String>,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

impl Node {
    fn from_element(element: Element) -> Self {
        Self {
            kind: element.kind,
            flags: element.flags,
            tab_index: element.tab_index,
            text: element.text,
            style: element.style,
            attributes: element.attributes,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

// =============================================================================
// Document
// =============================================================================

/// Default viewport, one terminal screen.
const DEFAULT_VIEWPORT: (u16, u16) = (80, 24);

/// Arena-backed element tree with layout and focus state.
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: Option<ElementId>,
    viewport: (u16, u16),
    focused: Signal<Option<ElementId>>,
    last_scrolled: Option<ElementId>,
    /// Invalidated on every structural or style mutation.
    layout_cache: RefCell<Option<LayoutSizes>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Document with a root container.
    pub fn new() -> Self {
        let mut doc = Self::headless();
        let root = doc.allocate(Node::from_element(Element::container()));
        doc.root = Some(root);
        doc
    }

    /// Document without a root; live regions cannot be created.
    pub fn headless() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            viewport: DEFAULT_VIEWPORT,
            focused: signal(None),
            last_scrolled: None,
            layout_cache: RefCell::new(None),
        }
    }

    /// Root container, `None` for a headless document.
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Viewport size in cells.
    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    /// Resize the viewport; labels wrap to its width.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.invalidate_layout();
    }

    /// Reactive focus state.
    pub fn focus_signal(&self) -> &Signal<Option<ElementId>> {
        &self.focused
    }

    /// Last element scrolled into view.
    pub fn last_scrolled(&self) -> Option<ElementId> {
        self.last_scrolled
    }

    // -------------------------------------------------------------------------
    // Arena
    // -------------------------------------------------------------------------

    fn allocate(&mut self, node: Node) -> ElementId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.node = Some(node);
            ElementId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            ElementId::new(index, 0)
        }
    }

    pub(crate) fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// Handle refers to a live (not released) element.
    pub fn exists(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    fn invalidate_layout(&self) {
        *self.layout_cache.borrow_mut() = None;
    }

    // -------------------------------------------------------------------------
    // Tree mutation
    // -------------------------------------------------------------------------

    /// Append a new element as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, element: Element) -> Result<ElementId> {
        if !self.exists(parent) {
            return Err(FocusError::UnknownElement(parent));
        }
        let mut node = Node::from_element(element);
        node.parent = Some(parent);
        let id = self.allocate(node);
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(id);
        }
        self.invalidate_layout();
        Ok(id)
    }

    /// Unlink `id` from its parent. The subtree stays alive but detached.
    pub fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        if self.focused.get().is_some_and(|f| !self.is_attached(f)) {
            self.focused.set(None);
        }
        self.invalidate_layout();
    }

    /// Detach `id` and release it together with all descendants.
    pub fn release(&mut self, id: ElementId) {
        if !self.exists(id) {
            return;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let index = current.index();
            let Some(slot) = self.slots.get_mut(index as usize) else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                self.free.push(index);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }
        self.invalidate_layout();
    }

    /// Mutate an element's style.
    pub fn set_style(&mut self, id: ElementId, update: impl FnOnce(&mut ElementStyle)) {
        if let Some(node) = self.node_mut(id) {
            update(&mut node.style);
            self.invalidate_layout();
        }
    }

    /// Set or clear element flags (disable a control, drop an href).
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags, enabled: bool) {
        if let Some(node) = self.node_mut(id) {
            node.flags.set(flags, enabled);
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Direct children in tree order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Explicit tabindex, if one was set.
    pub fn tab_index(&self, id: ElementId) -> Option<i32> {
        self.node(id).and_then(|n| n.tab_index)
    }

    /// Text of the element itself.
    pub fn text_content(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|n| n.text.as_str())
    }

    /// Attribute value.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    fn info(&self, id: ElementId) -> Option<ElementInfo> {
        self.node(id).map(|n| ElementInfo {
            id,
            kind: n.kind,
            flags: n.flags,
            tab_index: n.tab_index,
        })
    }

    /// Attached live regions, in tree order.
    pub fn live_regions(&self) -> Vec<ElementId> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        let mut result = Vec::new();
        self.walk(root, &mut |id| {
            if self.attribute(id, "aria-live").is_some() {
                result.push(id);
            }
        });
        result
    }

    /// Pre-order walk over the descendants of `container`.
    fn walk(&self, container: ElementId, visit: &mut dyn FnMut(ElementId)) {
        let Some(node) = self.node(container) else {
            return;
        };
        for &child in &node.children {
            visit(child);
            self.walk(child, visit);
        }
    }

    fn computed_visibility_hidden(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(element) = current {
            let Some(node) = self.node(element) else {
                return false;
            };
            match node.style.visibility {
                Visibility::Hidden => return true,
                Visibility::Visible => return false,
                Visibility::Inherit => current = node.parent,
            }
        }
        false
    }

    fn layout_size(&self, id: ElementId) -> (f32, f32) {
        let mut cache = self.layout_cache.borrow_mut();
        if cache.is_none() {
            match layout::compute_sizes(self) {
                Ok(sizes) => *cache = Some(sizes),
                Err(err) => {
                    tracing::warn!(%err, "layout failed, treating elements as unrendered");
                    *cache = Some(LayoutSizes::new());
                }
            }
        }
        cache
            .as_ref()
            .and_then(|sizes| sizes.get(&id).copied())
            .unwrap_or((0.0, 0.0))
    }

    // -------------------------------------------------------------------------
    // Native navigation
    // -------------------------------------------------------------------------

    /// Sequential (Tab / Shift+Tab) focus navigation over the whole document.
    ///
    /// Visits rendered focusable elements whose tabindex is not negative, in
    /// tree order, wrapping at both ends. Returns the newly focused element.
    pub fn move_focus_sequential(&mut self, forward: bool) -> Option<ElementId> {
        let root = self.root?;
        let order: Vec<ElementId> = locator::locate(&*self, root)
            .into_iter()
            .filter(|&id| self.tab_index(id).is_none_or(|t| t >= 0))
            .collect();
        if order.is_empty() {
            return None;
        }

        let len = order.len();
        let current = self
            .active_element()
            .and_then(|active| order.iter().position(|&id| id == active));
        let next = match current {
            None if forward => 0,
            None => len - 1,
            Some(pos) if forward => (pos + 1) % len,
            Some(pos) => (pos + len - 1) % len,
        };

        let target = order[next];
        self.focus(target);
        Some(target)
    }
}

// =============================================================================
// Surface
// =============================================================================

impl Surface for Document {
    fn query_descendants(
        &self,
        container: ElementId,
        predicate: &dyn Fn(&ElementInfo) -> bool,
    ) -> Vec<ElementId> {
        let mut result = Vec::new();
        self.walk(container, &mut |id| {
            if self.info(id).is_some_and(|info| predicate(&info)) {
                result.push(id);
            }
        });
        result
    }

    fn computed_visibility(&self, element: ElementId) -> ComputedVisibility {
        let Some(node) = self.node(element) else {
            return ComputedVisibility::default();
        };
        let (width, height) = self.layout_size(element);
        ComputedVisibility {
            display_none: node.style.display == Display::None,
            visibility_hidden: self.computed_visibility_hidden(element),
            width,
            height,
        }
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|n| n.parent)
    }

    fn is_attached(&self, element: ElementId) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        self.exists(element) && self.contains(root, element)
    }

    fn document_root(&self) -> Option<ElementId> {
        self.root
    }

    fn active_element(&self) -> Option<ElementId> {
        self.focused.get().filter(|&id| self.is_attached(id))
    }

    fn focus(&mut self, element: ElementId) {
        if self.is_attached(element) {
            self.focused.set(Some(element));
        }
    }

    fn scroll_into_view(&mut self, element: ElementId) {
        if self.is_attached(element) {
            self.last_scrolled = Some(element);
        }
    }

    fn set_tab_index(&mut self, element: ElementId, tab_index: i32) {
        if let Some(node) = self.node_mut(element) {
            node.tab_index = Some(tab_index);
        }
    }

    fn create_live_region(&mut self, politeness: Politeness) -> Result<ElementId> {
        let root = self.root.ok_or(FocusError::NoDocumentRoot)?;
        let mut region = Element::container()
            .attribute("aria-live", politeness.as_str())
            .attribute("aria-atomic", "true")
            .size(1.0, 1.0);
        region.style.absolute = true;
        self.append(root, region)
    }

    fn set_text_content(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.node_mut(element) {
            node.text = text.to_string();
            self.invalidate_layout();
        }
    }

    fn remove(&mut self, element: ElementId) {
        self.release(element);
    }
}
