use crate::core::error::{check_displayable, FetchError};
use crate::core::models::{DisplayState, LoopPhase};
use crate::core::retry::RetryState;
use crate::core::scheduler::{Scheduler, TimerHandle};
use crate::core::settings::{OnError, RefreshSettings};
use crate::core::worker::FetchExecutor;
use crate::sources::DataSource;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

/// Anything that can show one line of text, usually a label widget.
pub trait DisplaySurface {
    fn set_text(&self, text: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Leave the last good text on screen.
    KeepLast,
    /// Replace the text with a fixed indicator.
    Indicator(String),
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub placeholder: String,
    pub interval: Duration,
    pub max_backoff: Option<Duration>,
    pub error_policy: ErrorPolicy,
}

impl LoopConfig {
    pub fn from_settings(settings: &RefreshSettings) -> Self {
        let error_policy = match settings.on_error {
            OnError::Keep => ErrorPolicy::KeepLast,
            OnError::Indicator => ErrorPolicy::Indicator(settings.error_text.clone()),
        };

        Self {
            placeholder: settings.placeholder.clone(),
            interval: settings.interval(),
            max_backoff: settings.max_backoff(),
            error_policy,
        }
    }

    fn retry_state(&self) -> RetryState {
        match self.max_backoff {
            Some(max) => RetryState::with_backoff(self.interval, max),
            None => RetryState::fixed(self.interval),
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from_settings(&RefreshSettings::default())
    }
}

struct LoopInner {
    state: DisplayState,
    phase: LoopPhase,
    started: bool,
    retry: RetryState,
    error_policy: ErrorPolicy,
    pending: Option<TimerHandle>,
    source: Arc<dyn DataSource>,
    scheduler: Rc<dyn Scheduler>,
    executor: Rc<dyn FetchExecutor>,
    surface: Rc<dyn DisplaySurface>,
}

/// Keeps a display surface in sync with a data source, one cycle at a time.
///
/// Lives on the interface thread. Every callback it hands to the scheduler or
/// the executor holds a weak reference, so dropping the last `RefreshLoop`
/// clone invalidates all of them.
#[derive(Clone)]
pub struct RefreshLoop {
    inner: Rc<RefCell<LoopInner>>,
}

impl RefreshLoop {
    pub fn new(
        config: LoopConfig,
        source: Arc<dyn DataSource>,
        scheduler: Rc<dyn Scheduler>,
        executor: Rc<dyn FetchExecutor>,
        surface: Rc<dyn DisplaySurface>,
    ) -> Self {
        surface.set_text(&config.placeholder);

        let inner = LoopInner {
            state: DisplayState::new(config.placeholder.clone()),
            phase: LoopPhase::Idle,
            started: false,
            retry: config.retry_state(),
            error_policy: config.error_policy,
            pending: None,
            source,
            scheduler,
            executor,
            surface,
        };

        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Runs the first cycle immediately. Later calls do nothing.
    pub fn start(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.started || inner.phase == LoopPhase::Stopped {
                return;
            }
            inner.started = true;
            tracing::info!(
                source = inner.source.name(),
                interval_ms = inner.retry.current_delay().as_millis() as u64,
                "Starting refresh loop"
            );
        }

        run_cycle(&self.inner);
    }

    /// Refreshes right away unless a fetch is in flight or the loop is stopped.
    pub fn refresh_now(&self) -> bool {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase != LoopPhase::Idle {
                tracing::debug!(phase = inner.phase.name(), "Manual refresh ignored");
                return false;
            }
            inner.started = true;
            inner.pending.take()
        };

        tracing::debug!("Manual refresh requested");
        if let Some(handle) = pending {
            handle.cancel();
        }
        run_cycle(&self.inner);
        true
    }

    /// Tears the loop down. A fetch still in flight is discarded on arrival.
    pub fn stop(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase == LoopPhase::Stopped {
                return;
            }
            tracing::info!(
                in_flight = inner.phase == LoopPhase::Refreshing,
                cycles = inner.state.cycles,
                "Stopping refresh loop"
            );
            inner.phase = LoopPhase::Stopped;
            inner.pending.take()
        };

        if let Some(handle) = pending {
            handle.cancel();
        }
    }

    pub fn text(&self) -> String {
        self.inner.borrow().state.text().to_string()
    }

    #[allow(dead_code)]
    pub fn state(&self) -> DisplayState {
        self.inner.borrow().state.clone()
    }

    pub fn phase(&self) -> LoopPhase {
        self.inner.borrow().phase
    }

    pub fn cycles(&self) -> u64 {
        self.inner.borrow().state.cycles
    }

    #[allow(dead_code)]
    pub fn consecutive_failures(&self) -> u32 {
        self.inner.borrow().retry.consecutive_failures()
    }
}

fn run_cycle(inner: &Rc<RefCell<LoopInner>>) {
    let (executor, source, cycle) = {
        let mut guard = inner.borrow_mut();
        if guard.phase != LoopPhase::Idle {
            return;
        }
        guard.phase = LoopPhase::Refreshing;
        (
            Rc::clone(&guard.executor),
            Arc::clone(&guard.source),
            guard.state.cycles + 1,
        )
    };

    tracing::debug!(cycle, "Refresh cycle started");

    let weak = Rc::downgrade(inner);
    executor.execute(
        source,
        Box::new(move |result| match weak.upgrade() {
            Some(inner) => complete_cycle(&inner, cycle, result),
            None => tracing::debug!(cycle, "Refresh loop dropped, discarding fetch result"),
        }),
    );
}

fn complete_cycle(inner: &Rc<RefCell<LoopInner>>, cycle: u64, result: Result<String, FetchError>) {
    let (surface, scheduler, update, delay) = {
        let mut guard = inner.borrow_mut();
        let this = &mut *guard;

        if this.phase == LoopPhase::Stopped {
            tracing::debug!(cycle, "Refresh loop stopped, discarding fetch result");
            return;
        }

        this.state.cycles += 1;
        let update = match result.and_then(check_displayable) {
            Ok(text) => {
                if this.retry.is_in_backoff() {
                    tracing::info!(
                        failures = this.retry.consecutive_failures(),
                        "Data source recovered"
                    );
                }
                this.retry.record_success();
                this.state
                    .replace(text)
                    .then(|| this.state.text().to_string())
            }
            Err(e) => {
                this.retry.record_failure();
                let error = e.to_string();
                tracing::warn!(
                    cycle,
                    error = %error,
                    consecutive_failures = this.retry.consecutive_failures(),
                    next_delay_ms = this.retry.current_delay().as_millis() as u64,
                    "Refresh cycle failed"
                );
                match &this.error_policy {
                    ErrorPolicy::KeepLast => {
                        this.state.record_error(error);
                        None
                    }
                    ErrorPolicy::Indicator(indicator) => this
                        .state
                        .show_error(indicator, error)
                        .then(|| indicator.clone()),
                }
            }
        };

        (
            Rc::clone(&this.surface),
            Rc::clone(&this.scheduler),
            update,
            this.retry.current_delay(),
        )
    };

    if let Some(text) = update {
        tracing::debug!(cycle, text = %text, "Display updated");
        surface.set_text(&text);
    }

    let handle = scheduler.schedule(delay, next_tick(Rc::downgrade(inner)));

    let mut guard = inner.borrow_mut();
    if guard.phase == LoopPhase::Stopped {
        drop(guard);
        handle.cancel();
        return;
    }
    guard.phase = LoopPhase::Idle;
    guard.pending = Some(handle);
}

fn next_tick(weak: Weak<RefCell<LoopInner>>) -> Box<dyn FnOnce()> {
    Box::new(move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.borrow_mut().pending = None;
        run_cycle(&inner);
    })
}
