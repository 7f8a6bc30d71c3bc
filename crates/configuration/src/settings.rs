use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) yields a working local setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub dashboard: DashboardConfig,
    pub widget: WidgetConfig,
    pub logging: LoggingConfig,
}

/// Where the analytics backend lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL, e.g. "http://localhost:8080". `/symbols` and `/riskexposure`
    /// are appended to it.
    pub base_url: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: None,
        }
    }
}

/// Listen address of the dashboard server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Behavior switches for the dashboard and detail views.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// When set, opening a detail page before the dashboard has ever loaded
    /// triggers one symbols load instead of failing the lookup.
    pub detail_fallback_fetch: bool,
}

/// Color theme of the embedded market widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Light,
    Dark,
}

impl ColorTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTheme::Light => "light",
            ColorTheme::Dark => "dark",
        }
    }
}

/// Display configuration of the embedded market widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub locale: String,
    pub date_range: String,
    pub color_theme: ColorTheme,
    pub is_transparent: bool,
    pub autosize: bool,
    pub width: u32,
    pub height: u32,
    pub large_chart_url: String,
    /// Script injected into the widget container.
    pub script_src: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            date_range: "12M".to_string(),
            color_theme: ColorTheme::Dark,
            is_transparent: false,
            autosize: false,
            width: 350,
            height: 220,
            large_chart_url: String::new(),
            script_src:
                "https://s3.tradingview.com/external-embedding/embed-widget-mini-symbol-overview.js"
                    .to_string(),
        }
    }
}

/// Logging output. `RUST_LOG` takes precedence over `level` when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily-rolling log files. Stdout only when unset.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "forex-dashboard.log".to_string(),
        }
    }
}

impl Settings {
    /// Rejects settings that would only fail later at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.backend.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "backend.base_url {:?} is not a valid URL: {}",
                self.backend.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "backend.base_url must use http or https, got {:?}",
                url.scheme()
            )));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if self.widget.width == 0 || self.widget.height == 0 {
            return Err(ConfigError::ValidationError(
                "widget.width and widget.height must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
