use crate::core::scheduler::{Scheduler, TimerHandle};
use gtk4::glib;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Schedules callbacks on the default GLib main context.
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        // Cleared when the source fires; removing a finished source panics.
        let slot: Rc<Cell<Option<glib::SourceId>>> = Rc::new(Cell::new(None));

        let fired = Rc::clone(&slot);
        let id = glib::timeout_add_local_once(delay, move || {
            fired.take();
            callback();
        });
        slot.set(Some(id));

        TimerHandle::new(move || {
            if let Some(id) = slot.take() {
                id.remove();
            }
        })
    }
}
