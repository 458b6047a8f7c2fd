use std::time::Duration;

/// Delayed-call primitive of the interface's event loop.
///
/// Callbacks run on the thread that owns the event loop, so neither the
/// scheduler nor the callback needs to be `Send`.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Handle to one scheduled callback. Dropping it leaves the callback armed.
#[must_use = "dropping a TimerHandle leaves the callback armed with no way to cancel it"]
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Guarantees the callback will not run. No-op if it already ran.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::ManualScheduler;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_callback_fires_after_delay() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        let _handle = scheduler.schedule(
            Duration::from_millis(1000),
            Box::new(move || flag.set(true)),
        );

        scheduler.advance(Duration::from_millis(999));
        assert!(!fired.get());

        scheduler.advance(Duration::from_millis(1));
        assert!(fired.get());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancelled_callback_never_fires() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        let handle = scheduler.schedule(
            Duration::from_millis(1000),
            Box::new(move || flag.set(true)),
        );
        handle.cancel();

        scheduler.advance(Duration::from_secs(5));
        assert!(!fired.get());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let scheduler = ManualScheduler::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);

        let handle = scheduler.schedule(
            Duration::from_millis(10),
            Box::new(move || counter.set(counter.get() + 1)),
        );
        scheduler.advance(Duration::from_millis(10));
        handle.cancel();

        assert_eq!(count.get(), 1);
    }
}
