use std::path::PathBuf;

use once_cell::sync::OnceCell;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::error::{AppError, AppResult};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();
static LOGGER_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

const DEFAULT_LOG_DIRECTIVES: &str = "info,app::insight=debug,app::ledger=info";
const DEFAULT_FILE_PREFIX: &str = "trustshield.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

/// Where and how the application writes its logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub directives: String,
    pub rotation: LogRotation,
    pub stdout: bool,
}

impl LoggerConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            directives: DEFAULT_LOG_DIRECTIVES.to_string(),
            rotation: LogRotation::Daily,
            stdout: true,
        }
    }

    /// Reads `TRUSTSHIELD_LOG`, `TRUSTSHIELD_LOG_ROTATION` and `TRUSTSHIELD_LOG_STDOUT`.
    pub fn from_env(directory: impl Into<PathBuf>) -> Self {
        Self::from_vars(directory, |key| std::env::var(key).ok())
    }

    pub fn from_vars(
        directory: impl Into<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::new(directory);

        if let Some(directives) = lookup("TRUSTSHIELD_LOG").filter(|v| !v.trim().is_empty()) {
            config.directives = directives.trim().to_string();
        }
        if let Some(rotation) = lookup("TRUSTSHIELD_LOG_ROTATION")
            .as_deref()
            .and_then(LogRotation::parse)
        {
            config.rotation = rotation;
        }
        if let Some(stdout) = lookup("TRUSTSHIELD_LOG_STDOUT") {
            config.stdout = !matches!(stdout.trim(), "0" | "false" | "off");
        }

        config
    }

    pub fn env_filter(&self) -> AppResult<EnvFilter> {
        EnvFilter::try_new(&self.directives)
            .map_err(|err| AppError::other(format!("invalid log directives: {err}")))
    }

    fn appender(&self) -> AppResult<RollingFileAppender> {
        std::fs::create_dir_all(&self.directory)?;
        RollingFileAppender::builder()
            .rotation(self.rotation.rotation())
            .filename_prefix(&self.file_prefix)
            .build(&self.directory)
            .map_err(|err| AppError::other(format!("failed to open log file: {err}")))
    }
}

/// Installs the global subscriber. Only the first call takes effect.
pub fn init_logging(config: &LoggerConfig) -> AppResult<()> {
    LOGGER_INIT
        .get_or_try_init(|| {
            let env_filter = config.env_filter()?;
            let (non_blocking, guard) = tracing_appender::non_blocking(config.appender()?);

            LOGGER_GUARD
                .set(guard)
                .map_err(|_| AppError::other("logger already initialized"))?;

            let console = config.stdout.then(|| {
                fmt::layer()
                    .with_target(false)
                    .with_timer(UtcTime::rfc_3339())
            });

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .with(console)
                .try_init()
                .map_err(|err| AppError::other(format!("failed to install subscriber: {err}")))?;

            Ok(())
        })
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = LoggerConfig::from_vars("/tmp/logs", vars(&[]));
        assert_eq!(config, LoggerConfig::new("/tmp/logs"));
        assert_eq!(config.file_prefix, "trustshield.log");
        assert_eq!(config.rotation, LogRotation::Daily);
        assert!(config.stdout);
        assert!(config.env_filter().is_ok());
    }

    #[test]
    fn overrides_are_applied() {
        let config = LoggerConfig::from_vars(
            "/tmp/logs",
            vars(&[
                ("TRUSTSHIELD_LOG", " warn,app::view=trace "),
                ("TRUSTSHIELD_LOG_ROTATION", "Hourly"),
                ("TRUSTSHIELD_LOG_STDOUT", "off"),
            ]),
        );

        assert_eq!(config.directives, "warn,app::view=trace");
        assert_eq!(config.rotation, LogRotation::Hourly);
        assert!(!config.stdout);
    }

    #[test]
    fn unknown_rotation_and_blank_directives_keep_defaults() {
        let config = LoggerConfig::from_vars(
            "/tmp/logs",
            vars(&[("TRUSTSHIELD_LOG", "  "), ("TRUSTSHIELD_LOG_ROTATION", "weekly")]),
        );
        assert_eq!(config.directives, DEFAULT_LOG_DIRECTIVES);
        assert_eq!(config.rotation, LogRotation::Daily);
    }

    #[test]
    fn malformed_directives_are_reported() {
        let config = LoggerConfig {
            directives: "app::view=notalevel".to_string(),
            ..LoggerConfig::new("/tmp/logs")
        };
        assert!(matches!(config.env_filter(), Err(AppError::Other(_))));
    }

    #[test]
    fn init_creates_directory_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            stdout: false,
            ..LoggerConfig::new(dir.path().join("logs"))
        };

        init_logging(&config).unwrap();
        assert!(config.directory.is_dir());

        init_logging(&config).unwrap();
    }
}
