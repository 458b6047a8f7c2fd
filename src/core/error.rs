use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("data source failed: {0}")]
    Source(String),

    #[error("data source returned text containing a NUL byte")]
    InvalidText,

    #[error("fetch worker failed: {0}")]
    Worker(String),
}

impl FetchError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}

/// Rejects text the label cannot display.
pub fn check_displayable(text: String) -> Result<String, FetchError> {
    if text.contains('\0') {
        return Err(FetchError::InvalidText);
    }
    Ok(text)
}
