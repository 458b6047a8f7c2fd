use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopPhase {
    /// Waiting for the next tick.
    Idle,
    /// A fetch is in flight; the interface stays responsive.
    Refreshing,
    /// The hosting window has been torn down.
    Stopped,
}

impl LoopPhase {
    pub fn name(&self) -> &'static str {
        match self {
            LoopPhase::Idle => "idle",
            LoopPhase::Refreshing => "refreshing",
            LoopPhase::Stopped => "stopped",
        }
    }
}

/// The text shown to the user, plus what the loop knows about how it got there.
#[derive(Debug, Clone)]
pub struct DisplayState {
    text: String,
    pub updated_at: Option<DateTime<Local>>,
    pub last_error: Option<String>,
    pub cycles: u64,
}

impl DisplayState {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            text: placeholder.into(),
            updated_at: None,
            last_error: None,
            cycles: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Overwrites the text in full. Returns whether the visible text changed.
    pub fn replace(&mut self, text: String) -> bool {
        self.updated_at = Some(Local::now());
        self.last_error = None;
        if self.text == text {
            return false;
        }
        self.text = text;
        true
    }

    /// Like `replace`, but for the error indicator: the failure stays recorded.
    pub fn show_error(&mut self, indicator: &str, error: String) -> bool {
        self.last_error = Some(error);
        if self.text == indicator {
            return false;
        }
        self.text = indicator.to_string();
        true
    }

    pub fn record_error(&mut self, error: String) {
        self.last_error = Some(error);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    pub source: String,
    pub text: Option<String>,
    pub error: Option<String>,
    pub fetched_at: DateTime<Local>,
}
