//! Deterministic stand-ins for the event loop, the worker and the label.

use crate::core::error::FetchError;
use crate::core::refresh::DisplaySurface;
use crate::core::scheduler::{Scheduler, TimerHandle};
use crate::core::worker::{FetchCallback, FetchExecutor};
use crate::sources::DataSource;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Timer {
    id: u64,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

/// Virtual-clock scheduler. Time only moves through `advance`.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    timers: Rc<RefCell<Vec<Timer>>>,
    delays: RefCell<Vec<Duration>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Every delay ever passed to `schedule`, in order.
    pub fn scheduled_delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }

    /// Moves the clock forward, firing due callbacks in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;

        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let index = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.id))
                    .map(|(index, _)| index);
                index.map(|index| timers.remove(index))
            };

            let Some(timer) = next else {
                break;
            };
            self.now.set(timer.due);
            (timer.callback)();
        }

        self.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.delays.borrow_mut().push(delay);
        self.timers.borrow_mut().push(Timer {
            id,
            due: self.now.get() + delay,
            callback,
        });

        let timers = Rc::downgrade(&self.timers);
        TimerHandle::new(move || {
            if let Some(timers) = timers.upgrade() {
                timers.borrow_mut().retain(|timer| timer.id != id);
            }
        })
    }
}

/// Holds fetches until the test completes them, like a slow background worker.
#[derive(Default)]
pub struct DeferredExecutor {
    queue: RefCell<VecDeque<(Arc<dyn DataSource>, FetchCallback)>>,
}

impl DeferredExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs the oldest queued fetch and delivers its result.
    pub fn complete_next(&self) -> bool {
        let Some((source, done)) = self.queue.borrow_mut().pop_front() else {
            return false;
        };
        done(source.fetch());
        true
    }
}

impl FetchExecutor for DeferredExecutor {
    fn execute(&self, source: Arc<dyn DataSource>, done: FetchCallback) {
        self.queue.borrow_mut().push_back((source, done));
    }
}

/// Label stand-in that remembers every write.
#[derive(Default)]
pub struct RecordingSurface {
    writes: RefCell<Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.writes.borrow().last().cloned()
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_text(&self, text: &str) {
        self.writes.borrow_mut().push(text.to_string());
    }
}

/// Replays a fixed list of results, then fails.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<&str, FetchError>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|step| step.map(str::to_string))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DataSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn fetch(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .map_err(|_| FetchError::failed("script lock poisoned"))?
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::failed("script exhausted")))
    }
}
