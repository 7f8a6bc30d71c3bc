//! Process-wide `tracing` setup shared by the CLI and the web server binary.

use crate::error::ConfigError;
use crate::settings::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber: stdout always, plus a daily-rolling file
/// when `config.directory` is set.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = build_filter(config)?;
    let stdout_layer = fmt::layer().with_target(true);

    match &config.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                ConfigError::LoggingError(format!(
                    "cannot create log directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Ok(None)
        }
    }
}

/// `RUST_LOG` when present, otherwise the configured level with the HTTP
/// stack turned down to `warn`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let filter = EnvFilter::try_new(&config.level).map_err(|e| {
        ConfigError::LoggingError(format!("invalid log level {:?}: {}", config.level, e))
    })?;

    Ok(filter
        .add_directive(quiet("hyper")?)
        .add_directive(quiet("reqwest")?))
}

fn quiet(target: &str) -> Result<Directive, ConfigError> {
    format!("{}=warn", target)
        .parse()
        .map_err(|e| ConfigError::LoggingError(format!("invalid directive for {}: {}", target, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_directive_parses() {
        assert!(quiet("hyper").is_ok());
    }

    #[test]
    fn test_default_level_builds_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = build_filter(&LoggingConfig::default()).unwrap();
        assert!(filter.to_string().contains("hyper=warn"));
    }
}
