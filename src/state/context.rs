//! Shared engine state.
//!
//! Controllers install key listeners and hand back cleanups that outlive the
//! call, so the state they touch is reference counted. Everything is
//! single-threaded: `Rc<RefCell<_>>`, no locking, and correctness relies on
//! serialized calls.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::FocusConfig;

use super::history::FocusHistory;
use super::keyboard::KeyListeners;
use super::trap::TrapStack;

/// Handles to the state one engine instance owns.
pub struct FocusContext<S> {
    pub surface: Rc<RefCell<S>>,
    pub history: Rc<RefCell<FocusHistory>>,
    pub traps: Rc<RefCell<TrapStack>>,
    pub listeners: Rc<RefCell<KeyListeners>>,
    pub config: Rc<FocusConfig>,
}

impl<S> FocusContext<S> {
    pub fn new(surface: S, config: FocusConfig) -> Self {
        Self {
            surface: Rc::new(RefCell::new(surface)),
            history: Rc::new(RefCell::new(FocusHistory::with_limit(config.history_limit))),
            traps: Rc::new(RefCell::new(TrapStack::new())),
            listeners: Rc::new(RefCell::new(KeyListeners::new())),
            config: Rc::new(config),
        }
    }
}

// Manual impl: cloning the handles must not require `S: Clone`.
impl<S> Clone for FocusContext<S> {
    fn clone(&self) -> Self {
        Self {
            surface: Rc::clone(&self.surface),
            history: Rc::clone(&self.history),
            traps: Rc::clone(&self.traps),
            listeners: Rc::clone(&self.listeners),
            config: Rc::clone(&self.config),
        }
    }
}
