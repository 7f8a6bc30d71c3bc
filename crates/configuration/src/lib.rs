use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    BackendConfig, ColorTheme, DashboardConfig, LoggingConfig, ServerConfig, Settings,
    WidgetConfig,
};

/// File read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment overrides, e.g. `FOREX__BACKEND__BASE_URL`.
pub const ENV_PREFIX: &str = "FOREX";

/// Loads the application configuration from `config.toml` and the environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at
/// `path` (skipped when missing), then `FOREX__<SECTION>__<KEY>` environment
/// variables. The result is validated before it is returned.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

/// Parses settings from an in-memory TOML document, without environment overrides.
pub fn parse_settings(toml: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.backend.base_url, "http://localhost:8080");
        assert_eq!(settings.backend.timeout_secs, None);
        assert_eq!(settings.server.bind_addr(), "0.0.0.0:3000");
        assert!(!settings.dashboard.detail_fallback_fetch);
        assert_eq!(settings.widget.locale, "en");
        assert_eq!(settings.widget.date_range, "12M");
        assert_eq!(settings.widget.color_theme, ColorTheme::Dark);
        assert_eq!(settings.widget.width, 350);
        assert_eq!(settings.widget.height, 220);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let settings = parse_settings(
            r#"
            [backend]
            base_url = "http://analytics.internal:9000"
            timeout_secs = 5

            [widget]
            color_theme = "light"

            [dashboard]
            detail_fallback_fetch = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.backend.base_url, "http://analytics.internal:9000");
        assert_eq!(settings.backend.timeout_secs, Some(5));
        assert_eq!(settings.widget.color_theme, ColorTheme::Light);
        assert_eq!(settings.widget.locale, "en");
        assert!(settings.dashboard.detail_fallback_fetch);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = parse_settings("[backend]\nbase_url = \"not a url\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = parse_settings("[backend]\nbase_url = \"ftp://localhost\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_zero_sized_widget() {
        let err = parse_settings("[widget]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = load_settings_from(Path::new("does-not-exist/forex.toml")).unwrap();
        assert!(settings.backend.base_url.starts_with("http"));
    }
}
