//! # spark-focus
//!
//! Focus management and keyboard navigation for dynamic, partially visible
//! UI surfaces: modals, menus, toolbars.
//!
//! ## Architecture
//!
//! The engine never owns elements. It talks to the UI tree through the
//! [`Surface`] capability and to time through the [`Scheduler`] capability,
//! so it runs the same against a live renderer or the in-memory
//! [`dom::Document`] + [`VirtualClock`] pair used in tests.
//!
//! ```text
//! Locator → History → Trap / Roving → FocusManager ← Announcer
//!                 ↑                        ↓
//!              Surface  ←──── key events (handle_key)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Element handles, categories, computed style, options
//! - [`surface`] - The surface capability trait
//! - [`dom`] - In-memory reference surface with Taffy layout
//! - [`state`] - Locator, history, trap, roving, announcer, keyboard
//! - [`manager`] - The [`FocusManager`] facade

pub mod config;
pub mod dom;
pub mod error;
pub mod manager;
pub mod state;
pub mod surface;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::FocusConfig;
pub use error::{FocusError, Result};
pub use manager::FocusManager;
pub use surface::Surface;

pub use state::{
    // Keyboard
    KeyboardEvent, KeyState, Modifiers,
    // Controllers
    FocusHistory, RovingGroup, RovingOptions, TrapId, TrapScope, TrapStack,
    // Announcer
    Announcer, Scheduler, Task, VirtualClock,
};
pub use state::input::convert_key_event;
