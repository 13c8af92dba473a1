//! Reference surface - an in-memory element tree.
//!
//! - [`Document`] - generational element arena implementing [`Surface`](crate::surface::Surface)
//! - [`Element`] - builder describing an element to insert
//! - layout - Taffy bridge computing rendered areas

mod document;
mod layout;

pub use document::{Document, Element, ElementStyle};
pub use layout::string_width;
