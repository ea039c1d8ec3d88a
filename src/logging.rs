//! Logging
//!
//! Two halves:
//!
//! - [`RenderLog`]: the logging capability handed to the dispatcher and the
//!   reports view. Production code uses [`TracingLog`], which forwards every
//!   record to `tracing`; tests use [`MemoryLog`] to assert on what was
//!   logged.
//! - [`init_tracing`]: subscriber setup shared by the binaries.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LoggingConfig;

/// Severity of a render log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single captured log record
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Logging capability injected into pipeline components
pub trait RenderLog: Send + Sync {
    /// Record a message at the given level
    fn log(&self, level: LogLevel, message: &str);

    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Shared handle to a render log
pub type SharedLog = Arc<dyn RenderLog>;

/// Forwards records to the global `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl TracingLog {
    pub fn shared() -> SharedLog {
        Arc::new(TracingLog)
    }
}

impl RenderLog for TracingLog {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "reportview::pipeline", "{}", message),
            LogLevel::Debug => tracing::debug!(target: "reportview::pipeline", "{}", message),
            LogLevel::Info => tracing::info!(target: "reportview::pipeline", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "reportview::pipeline", "{}", message),
            LogLevel::Error => tracing::error!(target: "reportview::pipeline", "{}", message),
        }
    }
}

/// Captures records in memory
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Records at or above `level`
    pub fn at_least(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level >= level)
            .collect()
    }

    /// True if any record at `level` contains `needle`
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl RenderLog for MemoryLog {
    fn log(&self, level: LogLevel, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(LogRecord {
                level,
                message: message.to_string(),
            });
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "reportview={level},tower_http={level}",
            level = config.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Run `f` under a temporary stderr subscriber at `level`.
///
/// For work done before [`init_tracing`] can run, such as finding the
/// config file that decides the real log settings.
pub fn with_bootstrap_tracing<T>(level: &str, f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reportview={}", level)));
    with_scoped_subscriber(filter, std::io::stderr, f)
}

fn with_scoped_subscriber<T, W>(filter: EnvFilter, writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io::Write;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_scoped_subscriber_sees_config_loading() {
        let buf = SharedBuf::default();
        let writer = buf.clone();

        let config = with_scoped_subscriber(
            EnvFilter::new("reportview=info"),
            move || writer.clone(),
            Config::load_default,
        );

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("config"));
        assert!(!config.source.url.is_empty());
    }

    #[test]
    fn test_memory_log_captures_levels() {
        let log = MemoryLog::new();
        log.debug("surface missing");
        log.warn("bad chart_data");
        log.error("draw failed");

        assert_eq!(log.records().len(), 3);
        assert_eq!(log.at_least(LogLevel::Warn).len(), 2);
        assert!(log.contains(LogLevel::Warn, "chart_data"));
        assert!(!log.contains(LogLevel::Error, "chart_data"));
    }

    #[test]
    fn test_memory_log_clear() {
        let log = MemoryLog::new();
        log.info("hello");
        log.clear();
        assert!(log.records().is_empty());
    }

    #[test]
    fn test_level_display() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert!(LogLevel::Error > LogLevel::Debug);
    }
}
