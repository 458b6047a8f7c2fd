use crate::core::error::{check_displayable, FetchError};
use crate::sources::DataSource;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;
use std::sync::Arc;

pub const DEFAULT_FORMAT: &str = "現在時刻: %H:%M:%S";

type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Stand-in for a real data source: reports the current local time.
pub struct ClockSource {
    format: String,
    clock: Clock,
}

impl ClockSource {
    pub fn new(format: impl Into<String>) -> Self {
        Self::with_clock(format, Arc::new(Local::now))
    }

    pub fn with_clock(format: impl Into<String>, clock: Clock) -> Self {
        Self {
            format: format.into(),
            clock,
        }
    }

    pub fn is_valid_format(format: &str) -> bool {
        !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

impl DataSource for ClockSource {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn fetch(&self) -> Result<String, FetchError> {
        let now = (self.clock)();
        let mut text = String::new();
        write!(text, "{}", now.format(&self.format))
            .map_err(|_| FetchError::failed(format!("invalid time format {:?}", self.format)))?;
        check_displayable(text)
    }
}
