//! State Module - the focus engine's controllers
//!
//! - **Locator** - focusable, rendered elements of a container
//! - **History** - LIFO focus restoration
//! - **Trap** - nested Tab confinement for modals
//! - **Roving** - single tab stop with arrow-key navigation
//! - **Announcer** - live-region announcements on a scheduler
//! - **Keyboard** - key events and container listeners
//! - **Input** - crossterm key conversion

pub mod announcer;
pub mod context;
pub mod history;
pub mod input;
pub mod keyboard;
pub mod locator;
pub mod roving;
pub mod scheduler;
pub mod trap;

pub use announcer::Announcer;
pub use context::FocusContext;
pub use history::FocusHistory;
pub use keyboard::{KeyHandler, KeyListeners, KeyState, KeyboardEvent, Modifiers};
pub use roving::{RovingGroup, RovingOptions};
pub use scheduler::{Scheduler, Task, VirtualClock};
pub use trap::{TrapId, TrapScope, TrapStack};
