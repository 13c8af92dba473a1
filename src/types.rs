//! Core types for spark-focus.
//!
//! Handles, element categories and the small enums that flow between the
//! surface, the controllers and the facade.

use std::fmt;

// =============================================================================
// Element Handle
// =============================================================================

/// Handle to a node on an interactive surface.
///
/// Handles are generational: a slot that is released and reused gets a new
/// generation, so a stale handle never aliases a newer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    /// Create a handle from its raw parts.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Element Kind
// =============================================================================

/// Element category, as far as focus is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    /// Plain container or text node (div, span, p).
    #[default]
    Generic,
    /// Hyperlink. Only navigable with an href.
    Anchor,
    Button,
    Input,
    Select,
    TextArea,
    Audio,
    Video,
    /// Disclosure widget.
    Details,
    /// Disclosure widget label.
    Summary,
}

impl ElementKind {
    /// Form controls honour the disabled flag.
    pub fn is_form_control(self) -> bool {
        matches!(
            self,
            Self::Button | Self::Input | Self::Select | Self::TextArea
        )
    }

    /// Media elements are focusable only with native controls.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }

    /// Disclosure elements are always interactive.
    pub fn is_disclosure(self) -> bool {
        matches!(self, Self::Details | Self::Summary)
    }
}

bitflags::bitflags! {
    /// Focus-relevant element flags.
    ///
    /// Combine with bitwise OR: `ElementFlags::HREF | ElementFlags::DISABLED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        /// Anchor carries an href.
        const HREF = 1 << 0;
        /// Form control is disabled.
        const DISABLED = 1 << 1;
        /// Editable region.
        const CONTENT_EDITABLE = 1 << 2;
        /// Media element shows native controls.
        const CONTROLS = 1 << 3;
    }
}

/// Snapshot of the focus-relevant attributes of one element.
///
/// This is what locator predicates look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementInfo {
    pub id: ElementId,
    pub kind: ElementKind,
    pub flags: ElementFlags,
    /// Explicit tabindex, `None` when the attribute is absent.
    pub tab_index: Option<i32>,
}

// =============================================================================
// Computed Style
// =============================================================================

/// Computed `display` of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Flex,
    Block,
    None,
}

/// Computed `visibility` of an element. Inherited by descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Inherit,
    Visible,
    Hidden,
}

/// Rendering facts the locator needs about one element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComputedVisibility {
    /// Element's own computed display is `none`.
    pub display_none: bool,
    /// Element's computed (inherited) visibility is hidden.
    pub visibility_hidden: bool,
    /// Laid-out width.
    pub width: f32,
    /// Laid-out height.
    pub height: f32,
}

impl ComputedVisibility {
    /// Element occupies a non-zero layout area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Element is actually on screen.
    pub fn is_rendered(&self) -> bool {
        !self.display_none && !self.visibility_hidden && self.has_area()
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Arrow-key axis of a roving group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
    Both,
}

impl Orientation {
    /// ArrowLeft/ArrowRight are honoured.
    pub fn horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    /// ArrowUp/ArrowDown are honoured.
    pub fn vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }
}

/// Live-region politeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Politeness {
    /// Standard priority, read when the reader is idle.
    #[default]
    Polite,
    /// Urgent, interrupts current speech.
    Assertive,
}

impl Politeness {
    /// Value of the `aria-live` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// Cleanup function returned by activations.
///
/// Being `FnOnce`, a cleanup can only ever run once.
pub type Cleanup = Box<dyn FnOnce()>;

/// A cleanup that does nothing.
pub fn noop_cleanup() -> Cleanup {
    Box::new(|| {})
}
