use crate::core::error::FetchError;
use crate::sources::DataSource;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Completion callback, always invoked on the interface thread.
pub type FetchCallback = Box<dyn FnOnce(Result<String, FetchError>)>;

/// Decides where a Data Source call runs.
pub trait FetchExecutor {
    fn execute(&self, source: Arc<dyn DataSource>, done: FetchCallback);
}

/// Calls the Data Source synchronously on the interface thread.
///
/// A panicking source is reported as `FetchError::Worker`, the same way the
/// background executor reports it, so the loop survives it in both modes.
pub struct InlineExecutor;

impl FetchExecutor for InlineExecutor {
    fn execute(&self, source: Arc<dyn DataSource>, done: FetchCallback) {
        let result = catch_unwind(AssertUnwindSafe(|| source.fetch())).unwrap_or_else(|_| {
            tracing::error!(source = source.name(), "Data source panicked");
            Err(FetchError::Worker("data source panicked".into()))
        });
        done(result);
    }
}
