//! Taffy Bridge - rendered area for document elements
//!
//! Converts element styles to Taffy styles, runs layout over the attached
//! tree and extracts laid-out sizes. `display: none` subtrees get no box,
//! which is what makes them unreachable for the locator.

use std::collections::HashMap;

use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display as TaffyDisplay, FlexDirection, NodeId,
    Position, Size, Style, TaffyTree,
};
use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::types::{Display, ElementId, ElementKind};

use super::document::{Document, Node};

/// Laid-out width/height per attached element.
pub(crate) type LayoutSizes = HashMap<ElementId, (f32, f32)>;

/// What the measure function needs to size a leaf.
#[derive(Debug, Clone)]
struct MeasureContext {
    kind: ElementKind,
    label_width: u16,
}

/// Display width of a string in terminal cells, saturating at `u16::MAX`.
pub fn string_width(s: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(s)).unwrap_or(u16::MAX)
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn to_taffy_dimension(value: Option<f32>) -> TaffyDimension {
    match value {
        Some(n) => TaffyDimension::Length(n),
        None => TaffyDimension::Auto,
    }
}

fn build_style(node: &Node) -> Style {
    let style = &node.style;
    Style {
        display: match style.display {
            Display::None => TaffyDisplay::None,
            Display::Block => TaffyDisplay::Block,
            Display::Flex => TaffyDisplay::Flex,
        },
        position: if style.absolute {
            Position::Absolute
        } else {
            Position::Relative
        },
        flex_direction: FlexDirection::Column,
        size: Size {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },
        ..Default::default()
    }
}

/// Intrinsic size of a leaf element.
///
/// Controls are at least one cell, like a terminal input. Plain elements are
/// as large as their text, so an empty generic leaf has no area.
fn measure_leaf(
    ctx: &MeasureContext,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    let interactive = ctx.kind != ElementKind::Generic;
    let text_width = if interactive {
        ctx.label_width.max(1)
    } else {
        ctx.label_width
    };

    if text_width == 0 {
        return Size {
            width: known_dimensions.width.unwrap_or(0.0),
            height: known_dimensions.height.unwrap_or(0.0),
        };
    }

    let avail_width = match available_space.width {
        AvailableSpace::Definite(w) => w.max(1.0),
        AvailableSpace::MinContent => text_width as f32,
        AvailableSpace::MaxContent => f32::MAX,
    };
    let width = (text_width as f32).min(avail_width);
    let lines = (text_width as f32 / width).ceil();

    Size {
        width: known_dimensions.width.unwrap_or(width),
        height: known_dimensions.height.unwrap_or(lines),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Lay out every element attached under the document root.
pub(crate) fn compute_sizes(doc: &Document) -> Result<LayoutSizes> {
    let mut sizes = LayoutSizes::new();
    let Some(root) = doc.root() else {
        return Ok(sizes);
    };

    let mut tree: TaffyTree<MeasureContext> = TaffyTree::new();
    let mut element_to_node: Vec<(ElementId, NodeId)> = Vec::new();
    let root_node = build_subtree(doc, root, &mut tree, &mut element_to_node)?;

    let (width, height) = doc.viewport();
    let available = Size {
        width: AvailableSpace::Definite(width as f32),
        height: AvailableSpace::Definite(height as f32),
    };

    tree.compute_layout_with_measure(
        root_node,
        available,
        |known_dimensions, available_space, _node_id, context, _style| match context {
            Some(ctx) => measure_leaf(ctx, known_dimensions, available_space),
            None => Size::ZERO,
        },
    )?;

    for (element, node_id) in element_to_node {
        let layout = tree.layout(node_id)?;
        sizes.insert(element, (layout.size.width, layout.size.height));
    }

    Ok(sizes)
}

fn build_subtree(
    doc: &Document,
    element: ElementId,
    tree: &mut TaffyTree<MeasureContext>,
    element_to_node: &mut Vec<(ElementId, NodeId)>,
) -> Result<NodeId> {
    let Some(node) = doc.node(element) else {
        return Ok(tree.new_leaf(Style::default())?);
    };

    let context = MeasureContext {
        kind: node.kind,
        label_width: string_width(&node.text),
    };
    let node_id = tree.new_leaf_with_context(build_style(node), context)?;
    element_to_node.push((element, node_id));

    for &child in &node.children {
        let child_id = build_subtree(doc, child, tree, element_to_node)?;
        tree.add_child(node_id, child_id)?;
    }

    Ok(node_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("OK"), 2);
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width("e\u{301}"), 1);
    }

    #[test]
    fn test_wide_labels() {
        // Emoji and CJK Extension B are two cells each
        assert_eq!(string_width("😀"), 2);
        assert_eq!(string_width("𠀀𠀁"), 4);
        assert_eq!(string_width("Save 😀"), 7);
    }

    #[test]
    fn test_interactive_leaf_is_at_least_one_cell() {
        let ctx = MeasureContext {
            kind: ElementKind::Input,
            label_width: 0,
        };
        let size = measure_leaf(
            &ctx,
            Size { width: None, height: None },
            Size {
                width: AvailableSpace::Definite(80.0),
                height: AvailableSpace::Definite(24.0),
            },
        );
        assert_eq!(size.width, 1.0);
        assert_eq!(size.height, 1.0);
    }

    #[test]
    fn test_empty_generic_leaf_has_no_area() {
        let ctx = MeasureContext {
            kind: ElementKind::Generic,
            label_width: 0,
        };
        let size = measure_leaf(
            &ctx,
            Size { width: None, height: None },
            Size {
                width: AvailableSpace::Definite(80.0),
                height: AvailableSpace::Definite(24.0),
            },
        );
        assert_eq!(size, Size::ZERO);
    }
}
