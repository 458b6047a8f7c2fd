mod clock;

use crate::core::error::FetchError;
use crate::core::settings::{SourceKind, SourceSettings};
use std::sync::Arc;
use std::time::Duration;

pub use clock::{ClockSource, DEFAULT_FORMAT};

/// A zero-argument capability producing the next text for the label.
///
/// Implementations must be callable from a background worker, hence
/// `Send + Sync`.
pub trait DataSource: Send + Sync {
    fn name(&self) -> &'static str {
        "callable"
    }

    fn fetch(&self) -> Result<String, FetchError>;
}

impl<F> DataSource for F
where
    F: Fn() -> Result<String, FetchError> + Send + Sync,
{
    fn fetch(&self) -> Result<String, FetchError> {
        self()
    }
}

/// Wraps a source with an artificial delay, to exercise background fetch mode.
pub struct SlowSource {
    inner: Arc<dyn DataSource>,
    latency: Duration,
}

impl SlowSource {
    pub fn new(inner: Arc<dyn DataSource>, latency: Duration) -> Self {
        Self { inner, latency }
    }
}

impl DataSource for SlowSource {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn fetch(&self) -> Result<String, FetchError> {
        std::thread::sleep(self.latency);
        self.inner.fetch()
    }
}

pub fn from_settings(settings: &SourceSettings) -> Arc<dyn DataSource> {
    let source: Arc<dyn DataSource> = match settings.kind {
        SourceKind::Clock => Arc::new(ClockSource::new(settings.format.clone())),
    };

    if settings.latency_ms == 0 {
        return source;
    }

    tracing::debug!(
        source = source.name(),
        latency_ms = settings.latency_ms,
        "Wrapping data source with simulated latency"
    );
    Arc::new(SlowSource::new(
        source,
        Duration::from_millis(settings.latency_ms),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_closure_is_a_data_source() {
        let source = || -> Result<String, FetchError> { Ok("value".to_string()) };
        assert_eq!(DataSource::name(&source), "callable");
        assert_eq!(source.fetch(), Ok("value".to_string()));
    }

    #[test]
    fn test_from_settings_builds_clock() {
        let settings = SourceSettings::default();
        let source = from_settings(&settings);
        assert_eq!(source.name(), "clock");

        let text = source.fetch().unwrap();
        assert!(text.starts_with("現在時刻: "));
    }

    #[test]
    fn test_slow_source_delays_and_delegates() {
        let inner: Arc<dyn DataSource> =
            Arc::new(|| -> Result<String, FetchError> { Ok("late".to_string()) });
        let source = SlowSource::new(inner, Duration::from_millis(20));

        let started = Instant::now();
        assert_eq!(source.fetch(), Ok("late".to_string()));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_from_settings_applies_latency() {
        let settings = SourceSettings {
            latency_ms: 5,
            ..SourceSettings::default()
        };
        let source = from_settings(&settings);
        assert_eq!(source.name(), "clock");

        let started = Instant::now();
        source.fetch().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
