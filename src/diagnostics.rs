//! Operator-facing diagnostic channel.
//!
//! The library reports misconfiguration and failed writes through the `log`
//! facade under the `tierlog` target. Applications that do not already
//! install a `log` implementation can use [`Builder`] to send those warnings
//! to stderr, a file or memory.

use std::{
    io::IsTerminal,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use eyre::Context;
use log::{LevelFilter, Log};
use yansi::Paint;

use crate::logging::{FileSink, LogSink, MemorySink, NullSink, StderrSink};

#[derive(Debug, Clone)]
pub struct Config {
    pub enabled: bool,
    pub datetime_format: String,
    pub use_ansi: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            enabled: true,
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            use_ansi: std::io::stderr().is_terminal(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DiagnosticFormatter {
    config: Config,
}

impl DiagnosticFormatter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn timestamp(&self) -> String {
        let time = chrono::Local::now().format(&self.config.datetime_format);
        let stamp = format!("[{}]", time);
        if self.config.use_ansi {
            stamp.bright_black().to_string()
        } else {
            stamp
        }
    }

    fn format_level(&self, level: log::Level) -> String {
        let tag = match level {
            log::Level::Error => "ERR",
            log::Level::Warn => "WRN",
            log::Level::Info => "INF",
            log::Level::Debug => "DEB",
            log::Level::Trace => "TRC",
        };

        if !self.config.use_ansi {
            return tag.to_string();
        }

        match level {
            log::Level::Error => tag.red().to_string(),
            log::Level::Warn => tag.yellow().to_string(),
            log::Level::Info => tag.green().to_string(),
            log::Level::Debug => tag.blue().to_string(),
            log::Level::Trace => tag.white().to_string(),
        }
    }

    pub fn format(&self, record: &log::Record) -> String {
        let message = record.args().to_string();
        let message = if self.config.use_ansi {
            message.bold().to_string()
        } else {
            message
        };

        format!(
            "{} {}: {}",
            self.timestamp(),
            self.format_level(record.level()),
            message
        )
    }
}

pub struct DiagnosticLogger {
    filter: LevelFilter,
    sink: Mutex<Box<dyn LogSink>>,
    formatter: DiagnosticFormatter,
    config: Config,
}

impl DiagnosticLogger {
    pub fn new(filter: LevelFilter, sink: Box<dyn LogSink>, config: Config) -> Self {
        Self {
            filter,
            sink: Mutex::new(sink),
            formatter: DiagnosticFormatter::new(config.clone()),
            config,
        }
    }

    /// Registers this logger as the process-wide `log` implementation.
    pub fn init(self) -> eyre::Result<()> {
        log::set_max_level(self.filter);
        log::set_boxed_logger(Box::new(self)).context("Failed registering diagnostic logger")?;

        Ok(())
    }
}

impl Log for DiagnosticLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.config.enabled && self.filter >= metadata.level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.formatter.format(record);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        // Nowhere left to report a failing diagnostic sink.
        let _ = sink.write_line(&line);
    }

    fn flush(&self) {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

/// Where a built [`DiagnosticLogger`] writes.
enum Destination {
    Stderr,
    File(PathBuf),
    Memory(MemorySink),
    Null,
}

impl Destination {
    fn open(self) -> eyre::Result<Box<dyn LogSink>> {
        match self {
            Destination::Stderr => Ok(Box::new(StderrSink::new())),
            Destination::File(path) => {
                let sink = FileSink::open(&path, true);
                if !sink.is_writable() {
                    return Err(eyre::eyre!(
                        "Failed opening or creating diagnostics log file {}",
                        path.display()
                    ));
                }
                Ok(Box::new(sink))
            }
            Destination::Memory(sink) => Ok(Box::new(sink)),
            Destination::Null => Ok(Box::new(NullSink::new())),
        }
    }
}

/// Builds a [`DiagnosticLogger`]. Writes to stderr unless another sink is
/// chosen; [`Builder::with_null_sink`] turns diagnostics off entirely.
pub struct Builder {
    filter: LevelFilter,
    destination: Destination,
    config: Config,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            filter: LevelFilter::Warn,
            destination: Destination::Stderr,
            config: Config::new(),
        }
    }

    pub fn with_level(self, filter: LevelFilter) -> Self {
        Self { filter, ..self }
    }

    pub fn with_ansi(mut self, use_ansi: bool) -> Self {
        self.config.use_ansi = use_ansi;
        self
    }

    pub fn with_file_sink(self, path: impl Into<PathBuf>) -> Self {
        Self {
            destination: Destination::File(path.into()),
            ..self
        }
    }

    pub fn with_stderr_sink(self) -> Self {
        Self {
            destination: Destination::Stderr,
            ..self
        }
    }

    pub fn with_memory_sink(self, sink: MemorySink) -> Self {
        Self {
            destination: Destination::Memory(sink),
            ..self
        }
    }

    pub fn with_null_sink(self) -> Self {
        Self {
            destination: Destination::Null,
            ..self
        }
    }

    pub fn build(self) -> eyre::Result<DiagnosticLogger> {
        let sink = self.destination.open()?;
        Ok(DiagnosticLogger::new(self.filter, sink, self.config))
    }

    pub fn init(self) -> eyre::Result<()> {
        self.build()?.init()
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
