use std::path::PathBuf;

use derive_more::derive::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    EnvFilter,
};

#[derive(Debug, Display, Error, From)]
pub enum LoggingSetupError {
    #[display("Cannot parse the log filter")]
    InvalidFilter(tracing_subscriber::filter::ParseError),
    #[display("Cannot install the global subscriber")]
    Install(tracing_subscriber::util::TryInitError),
}

/// Format of the log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directives, in the `RUST_LOG` syntax
    pub level: String,
    pub format: LogFormat,
    /// Log to this file instead of the standard output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: if cfg!(debug_assertions) {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            }
            .to_string(),
            format: LogFormat::Full,
            file: None,
        }
    }
}

/// Install the global subscriber
///
/// The returned guard must be kept alive while logging to a file.
pub(crate) fn init(
    LoggingConfig {
        level,
        format,
        file,
    }: LoggingConfig,
) -> Result<Option<WorkerGuard>, LoggingSetupError> {
    let filter = EnvFilter::try_new(level)?;

    let ansi = file.is_none();
    let (writer, guard) = match file {
        Some(path) => {
            let (directory, file_name) = match (path.parent(), path.file_name()) {
                (Some(directory), Some(file_name)) => {
                    (directory.to_path_buf(), file_name.to_os_string())
                }
                _ => (PathBuf::from("."), path.into_os_string()),
            };
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Full => registry.with(layer).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    }?;

    Ok(guard)
}
