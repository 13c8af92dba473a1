//! Error type for surface capabilities.
//!
//! Focus operations are fail-soft: empty scopes and stale history entries are
//! not errors. Only a failing surface capability surfaces here.

use crate::types::ElementId;

/// Focus engine error
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    #[error("surface has no document root to attach live regions to")]
    NoDocumentRoot,

    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    #[error("layout failed: {0}")]
    Layout(String),
}

impl From<taffy::TaffyError> for FocusError {
    fn from(err: taffy::TaffyError) -> Self {
        Self::Layout(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FocusError>;
