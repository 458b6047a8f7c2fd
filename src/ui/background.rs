use crate::core::error::FetchError;
use crate::core::worker::{FetchCallback, FetchExecutor};
use crate::sources::DataSource;
use gtk4::glib;
use std::sync::Arc;

/// Runs Data Source calls on the tokio blocking pool and delivers the result
/// back on the GLib main context, so only the label update touches the
/// interface thread.
pub struct BackgroundExecutor {
    runtime: tokio::runtime::Handle,
    context: glib::MainContext,
}

impl BackgroundExecutor {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self::with_context(runtime, glib::MainContext::default())
    }

    pub fn with_context(runtime: tokio::runtime::Handle, context: glib::MainContext) -> Self {
        Self { runtime, context }
    }
}

impl FetchExecutor for BackgroundExecutor {
    fn execute(&self, source: Arc<dyn DataSource>, done: FetchCallback) {
        let name = source.name();
        let task = self.runtime.spawn_blocking(move || source.fetch());

        self.context.spawn_local(async move {
            let result = task
                .await
                .unwrap_or_else(|e| Err(FetchError::Worker(e.to_string())));
            tracing::debug!(source = name, ok = result.is_ok(), "Background fetch finished");
            done(result);
        });
    }
}
