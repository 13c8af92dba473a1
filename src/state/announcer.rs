//! Screen-reader announcer - transient live regions.
//!
//! Each announcement gets its own visually hidden live region:
//!
//! ```text
//! t = 0              region inserted, empty
//! t = delay          text set (readers react to the mutation)
//! t = display window region removed, if still attached
//! ```
//!
//! The region must exist before its text changes; readers pick up content
//! mutations of known regions, not content that arrives with a new node.
//! No coalescing or rate limiting happens here.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::error::Result;
use crate::surface::Surface;
use crate::types::Politeness;

use super::scheduler::Scheduler;

/// Posts announcements through live regions on a surface.
pub struct Announcer<S> {
    surface: Rc<RefCell<S>>,
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    display_window: Duration,
}

impl<S: Surface + 'static> Announcer<S> {
    pub fn new(
        surface: Rc<RefCell<S>>,
        scheduler: Rc<dyn Scheduler>,
        delay: Duration,
        display_window: Duration,
    ) -> Self {
        Self {
            surface,
            scheduler,
            delay,
            display_window,
        }
    }

    /// Announce `message`. Fails only if the surface cannot create a region.
    ///
    /// The scheduled callbacks borrow the surface, so the scheduler must not
    /// be driven while the surface is borrowed.
    pub fn announce(&self, message: &str, politeness: Politeness) -> Result<()> {
        let region = self.surface.borrow_mut().create_live_region(politeness)?;
        tracing::debug!(%region, politeness = politeness.as_str(), "announcement queued");

        let surface = Rc::clone(&self.surface);
        let text = message.to_string();
        self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                surface.borrow_mut().set_text_content(region, &text);
            }),
        );

        let surface = Rc::clone(&self.surface);
        self.scheduler.schedule(
            self.display_window,
            Box::new(move || {
                let mut surface = surface.borrow_mut();
                if surface.is_attached(region) {
                    surface.remove(region);
                }
            }),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::error::FocusError;
    use crate::state::scheduler::VirtualClock;

    fn setup(doc: Document) -> (Rc<RefCell<Document>>, Rc<VirtualClock>, Announcer<Document>) {
        let surface = Rc::new(RefCell::new(doc));
        let clock = Rc::new(VirtualClock::new());
        let announcer = Announcer::new(
            Rc::clone(&surface),
            clock.clone(),
            Duration::from_millis(100),
            Duration::from_millis(1000),
        );
        (surface, clock, announcer)
    }

    #[test]
    fn test_two_phase_lifecycle() {
        let (surface, clock, announcer) = setup(Document::new());
        announcer.announce("Saved", Politeness::Polite).unwrap();

        let regions = surface.borrow().live_regions();
        assert_eq!(regions.len(), 1);
        let region = regions[0];
        assert_eq!(surface.borrow().text_content(region), Some(""));
        assert_eq!(surface.borrow().attribute(region, "aria-live"), Some("polite"));

        clock.advance(Duration::from_millis(99));
        assert_eq!(surface.borrow().text_content(region), Some(""));

        clock.advance(Duration::from_millis(1));
        assert_eq!(surface.borrow().text_content(region), Some("Saved"));

        clock.advance(Duration::from_millis(899));
        assert!(surface.borrow().is_attached(region));

        clock.advance(Duration::from_millis(1));
        assert!(!surface.borrow().is_attached(region));
        assert!(surface.borrow().live_regions().is_empty());
    }

    #[test]
    fn test_concurrent_announcements_are_independent() {
        let (surface, clock, announcer) = setup(Document::new());
        announcer.announce("one", Politeness::Polite).unwrap();
        announcer.announce("two", Politeness::Assertive).unwrap();

        let regions = surface.borrow().live_regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(surface.borrow().attribute(regions[1], "aria-live"), Some("assertive"));

        clock.advance(Duration::from_millis(100));
        assert_eq!(surface.borrow().text_content(regions[0]), Some("one"));
        assert_eq!(surface.borrow().text_content(regions[1]), Some("two"));
    }

    #[test]
    fn test_region_removed_early_is_left_alone() {
        let (surface, clock, announcer) = setup(Document::new());
        announcer.announce("gone", Politeness::Polite).unwrap();
        let region = surface.borrow().live_regions()[0];

        surface.borrow_mut().remove(region);
        assert_eq!(clock.advance(Duration::from_secs(2)), 2);
        assert!(surface.borrow().live_regions().is_empty());
    }

    #[test]
    fn test_missing_root_propagates() {
        let (_surface, clock, announcer) = setup(Document::headless());
        let result = announcer.announce("nowhere", Politeness::Polite);
        assert!(matches!(result, Err(FocusError::NoDocumentRoot)));
        assert_eq!(clock.pending(), 0);
    }
}
