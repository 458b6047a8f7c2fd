use crate::sources::ClockSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    pub window: WindowSettings,
    pub refresh: RefreshSettings,
    pub source: SourceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub font_family: String,
    pub font_size: u32,
    pub padding: i32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "定期DBアクセスサンプル".to_string(),
            width: 300,
            height: 100,
            font_family: "Meiryo".to_string(),
            font_size: 16,
            padding: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    #[default]
    Inline,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    #[default]
    Keep,
    Indicator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    pub placeholder: String,
    pub interval_ms: u64,
    pub mode: FetchMode,
    pub on_error: OnError,
    pub error_text: String,
    /// 0 keeps the delay fixed after failures.
    pub max_backoff_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            placeholder: "初期値".to_string(),
            interval_ms: 1000,
            mode: FetchMode::Inline,
            on_error: OnError::Keep,
            error_text: "取得エラー".to_string(),
            max_backoff_ms: 0,
        }
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn max_backoff(&self) -> Option<Duration> {
        (self.max_backoff_ms > 0).then(|| Duration::from_millis(self.max_backoff_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Clock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub format: String,
    pub latency_ms: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Clock,
            format: crate::sources::DEFAULT_FORMAT.to_string(),
            latency_ms: 0,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("refresh-label").join("config.toml"))
    }

    /// Loads from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path().context("Could not determine config directory")?,
        };

        if !path.exists() {
            tracing::info!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(?path, "Loaded config");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh.interval_ms == 0 {
            anyhow::bail!("refresh.interval_ms must be greater than 0");
        }
        if self.refresh.max_backoff_ms != 0 && self.refresh.max_backoff_ms < self.refresh.interval_ms
        {
            anyhow::bail!(
                "refresh.max_backoff_ms must be 0 or at least refresh.interval_ms ({}), got {}",
                self.refresh.interval_ms,
                self.refresh.max_backoff_ms
            );
        }
        if self.window.width <= 0 || self.window.height <= 0 {
            anyhow::bail!(
                "window size must be positive, got {}x{}",
                self.window.width,
                self.window.height
            );
        }
        if self.window.font_size == 0 {
            anyhow::bail!("window.font_size must be greater than 0");
        }
        if self.window.padding < 0 {
            anyhow::bail!("window.padding must not be negative, got {}", self.window.padding);
        }
        if !ClockSource::is_valid_format(&self.source.format) {
            anyhow::bail!("source.format is not a valid strftime string: {:?}", self.source.format);
        }
        Ok(())
    }
}
