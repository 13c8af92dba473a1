//! Scheduler capability - deferred, non-blocking callbacks.
//!
//! The announcer never sleeps. It hands callbacks to a [`Scheduler`] owned by
//! the host. [`VirtualClock`] is a tick-driven implementation: the host (or a
//! test) advances it and every callback whose deadline has passed runs, in
//! deadline order.
//!
//! # Example
//!
//! ```ignore
//! let clock = Rc::new(VirtualClock::new());
//! clock.schedule(Duration::from_millis(100), Box::new(|| println!("later")));
//!
//! // In the frame loop:
//! clock.advance(frame_time);
//! ```

use std::cell::RefCell;
use std::time::Duration;

/// Deferred callback.
pub type Task = Box<dyn FnOnce()>;

/// Runs a callback after a delay without blocking the caller.
///
/// There is no cancellation: once scheduled, a task runs.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task);
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// Deterministic clock driven by explicit `advance` calls.
#[derive(Default)]
pub struct VirtualClock {
    state: RefCell<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of tasks not yet run.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Move time forward by `by`, running every task that falls due.
    ///
    /// Tasks run in deadline order (ties in scheduling order) and may
    /// schedule further tasks; those run too if they fall inside the window.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.borrow().now + by;
        let mut ran = 0;

        loop {
            // Take the next due task out before running it, so the task is
            // free to schedule more work.
            let next = {
                let mut state = self.state.borrow_mut();
                let position = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);
                position.map(|i| {
                    let pending = state.pending.swap_remove(i);
                    state.now = pending.due;
                    pending.task
                })
            };

            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }

        self.state.borrow_mut().now = target;
        ran
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(Pending { due, seq, task });
    }
}
