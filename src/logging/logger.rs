use std::{fmt, path::Path, path::PathBuf};

use super::{
    formatters::DefaultFormatter,
    routing::{Options, Routing},
    sinks::{FileSink, Sinks, StderrSink, StdoutSink},
    Level, LogFormatter, LogSink, LogValue, TagTable, Target,
};
use crate::error::Result;

/// Buffers one message at a time and routes it to its targets on commit.
///
/// Text is accumulated with [`append`](Logger::append) (or `write!`, the
/// logger implements [`fmt::Write`]) and sent with
/// [`commit_at`](Logger::commit_at). The buffer is emptied by every commit,
/// whether it succeeds or not.
///
/// The logger is `Send` but has no internal locking; share it as
/// `Arc<Mutex<Logger>>` and hold the lock across append and commit.
pub struct Logger {
    routing: Routing,
    options: Options,
    tags: TagTable,
    formatter: Box<dyn LogFormatter>,
    sinks: Sinks,
    buffer: String,
}

impl Logger {
    /// Creates a logger for `path` with the default options and routing:
    /// info and data to stdout, warnings and above to stderr.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Builder::new(path).assemble()
    }

    pub fn builder(path: impl Into<PathBuf>) -> Builder {
        Builder::new(path)
    }

    pub fn append(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.buffer.push_str(text.as_ref());
        self
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn commit(&mut self) -> Result<()> {
        self.commit_at(Level::Info)
    }

    pub fn commit_at(&mut self, level: Level) -> Result<()> {
        let body = std::mem::take(&mut self.buffer);

        match self.formatter.format(level, &body) {
            Ok(line) => self.dispatch(level, &line),
            Err(err) => {
                log::warn!(target: "tierlog", "{}, reverting to {} instead", err, Level::Info);
                self.commit_fallback(&body);
                Err(err)
            }
        }
    }

    // Re-sends a body whose level had no tag at info. Never retries again.
    fn commit_fallback(&mut self, body: &str) {
        match self.formatter.format(Level::Info, body) {
            Ok(line) => {
                let _ = self.dispatch(Level::Info, &line);
            }
            Err(err) => {
                log::error!(target: "tierlog", "{}, message dropped", err);
            }
        }
    }

    fn dispatch(&mut self, level: Level, line: &str) -> Result<()> {
        if let Err(err) = self.validate() {
            if self.options.pedantic {
                log::error!(target: "tierlog", "{}, refusing to commit", err);
                return Err(err);
            }
            log::warn!(target: "tierlog", "{}, commit may produce unexpected results", err);
        }

        let tier = self.routing.tier_for(level);
        for target in self.routing.targets(tier) {
            if let Err(err) = self.sinks.write_to(target, line) {
                log::debug!(target: "tierlog", "stopped delivering to {} tier after failed write", tier);
                return Err(err);
            }
        }

        Ok(())
    }

    pub fn log_message(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.log_message_at(Level::Info, text)
    }

    pub fn log_message_at(&mut self, level: Level, text: impl AsRef<str>) -> Result<()> {
        self.append(text);
        self.commit_at(level).inspect_err(|_| {
            log::warn!(target: "tierlog", "log_message failed while committing log message");
        })
    }

    /// Logs `name=value` at [`Level::Data`].
    pub fn log_data(&mut self, name: impl AsRef<str>, value: impl Into<LogValue>) -> Result<()> {
        let value = value.into();
        self.append(name).append("=").append(value.to_string());
        self.commit_at(Level::Data).inspect_err(|_| {
            log::warn!(target: "tierlog", "log_data failed while committing log message");
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.routing.validate(&self.tags)
    }

    pub fn set_default_targets(&mut self, targets: Vec<Target>) -> Result<()> {
        self.update_routing(|routing| routing.default_targets = targets)
    }

    pub fn set_error_targets(&mut self, targets: Vec<Target>) -> Result<()> {
        self.update_routing(|routing| routing.error_targets = targets)
    }

    pub fn set_squelch_targets(&mut self, targets: Vec<Target>) -> Result<()> {
        self.update_routing(|routing| routing.squelch_targets = targets)
    }

    pub fn set_error_threshold(&mut self, level: Level) -> Result<()> {
        self.update_routing(|routing| routing.error_threshold = level)
    }

    pub fn set_squelch_threshold(&mut self, level: Level) -> Result<()> {
        self.update_routing(|routing| routing.squelch_threshold = level)
    }

    pub fn set_routing(&mut self, routing: Routing) -> Result<()> {
        self.update_routing(|current| *current = routing)
    }

    /// Applies `change` to a copy of the routing and validates the copy.
    /// Pedantic loggers keep the old routing when the copy is invalid, lenient
    /// ones store it and warn.
    fn update_routing(&mut self, change: impl FnOnce(&mut Routing)) -> Result<()> {
        let mut candidate = self.routing.clone();
        change(&mut candidate);

        if let Err(err) = candidate.validate(&self.tags) {
            if self.options.pedantic {
                log::error!(target: "tierlog", "{}, configuration change rejected", err);
                return Err(err);
            }
            log::warn!(target: "tierlog", "{}, commits will keep warning about it", err);
        }

        if candidate.thresholds_inverted() {
            log::warn!(
                target: "tierlog",
                "squelch threshold {} is above error threshold {}, levels from {} up go to the error targets",
                candidate.squelch_threshold,
                candidate.error_threshold,
                candidate.error_threshold
            );
        }

        self.routing = candidate;
        Ok(())
    }

    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    pub fn file_path(&self) -> &Path {
        self.sinks.file().path()
    }

    pub fn file_writable(&self) -> bool {
        self.sinks.file().is_writable()
    }

    pub fn flush(&mut self) {
        self.sinks.flush();
    }
}

impl fmt::Write for Logger {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

pub struct Builder {
    path: PathBuf,
    options: Options,
    tags: TagTable,
    routing: Routing,
    stdout: Option<Box<dyn LogSink>>,
    stderr: Option<Box<dyn LogSink>>,
    formatter_builder: Box<dyn Fn(Options, TagTable) -> Box<dyn LogFormatter>>,
}

impl Builder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: Options::default(),
            tags: TagTable::default(),
            routing: Routing::default(),
            stdout: None,
            stderr: None,
            formatter_builder: Box::new(
                |options: Options, tags: TagTable| -> Box<dyn LogFormatter> {
                    Box::new(DefaultFormatter::new(options, tags))
                },
            ),
        }
    }

    pub fn with_options(self, options: Options) -> Self {
        Self { options, ..self }
    }

    pub fn pedantic(mut self) -> Self {
        self.options.pedantic = true;
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.options.timestamp = false;
        self
    }

    /// Truncate the log file on construction instead of appending to it.
    pub fn overwrite(mut self) -> Self {
        self.options.append = false;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.separator = separator.into();
        self
    }

    pub fn with_tags(self, tags: TagTable) -> Self {
        Self { tags, ..self }
    }

    pub fn with_routing(self, routing: Routing) -> Self {
        Self { routing, ..self }
    }

    pub fn with_stdout_sink(self, sink: impl LogSink + 'static) -> Self {
        Self {
            stdout: Some(Box::new(sink)),
            ..self
        }
    }

    pub fn with_stderr_sink(self, sink: impl LogSink + 'static) -> Self {
        Self {
            stderr: Some(Box::new(sink)),
            ..self
        }
    }

    pub fn with_formatter<F>(self, formatter_builder: F) -> Self
    where
        F: Fn(Options, TagTable) -> Box<dyn LogFormatter> + 'static,
    {
        Self {
            formatter_builder: Box::new(formatter_builder),
            ..self
        }
    }

    /// Validates the routing and creates the logger. Invalid routing is an
    /// error for pedantic loggers and a warning otherwise.
    pub fn build(self) -> Result<Logger> {
        if let Err(err) = self.routing.validate(&self.tags) {
            if self.options.pedantic {
                return Err(err);
            }
            log::warn!(target: "tierlog", "{}", err);
        }

        Ok(self.assemble())
    }

    fn assemble(self) -> Logger {
        let file = FileSink::open(self.path, self.options.append);
        let stdout = self
            .stdout
            .unwrap_or_else(|| Box::new(StdoutSink::new()));
        let stderr = self
            .stderr
            .unwrap_or_else(|| Box::new(StderrSink::new()));
        let formatter = (self.formatter_builder)(self.options.clone(), self.tags.clone());

        Logger {
            routing: self.routing,
            options: self.options,
            tags: self.tags,
            formatter,
            sinks: Sinks::new(stdout, stderr, file),
            buffer: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use super::*;
    use crate::logging::MemorySink;

    fn quiet_logger(dir: &tempfile::TempDir) -> (Logger, MemorySink) {
        let out = MemorySink::new();
        let logger = Logger::builder(dir.path().join("test.log"))
            .without_timestamp()
            .with_stdout_sink(out.clone())
            .with_stderr_sink(MemorySink::new())
            .build()
            .unwrap();
        (logger, out)
    }

    #[test]
    fn append_accumulates_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut logger, out) = quiet_logger(&dir);

        logger.append("hello").append(", ").append("world");
        assert_eq!(logger.buffer(), "hello, world");

        logger.commit().unwrap();
        assert_eq!(logger.buffer(), "");
        assert_eq!(out.lines(), vec!["info|hello, world"]);
    }

    #[test]
    fn write_macro_appends_to_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let (mut logger, out) = quiet_logger(&dir);

        write!(logger, "retries={} ok={}", 3, false).unwrap();
        logger.commit_at(Level::Data).unwrap();

        assert_eq!(out.lines(), vec!["data|retries=3 ok=false"]);
    }

    #[test]
    fn log_data_appends_to_pending_text() {
        let dir = tempfile::tempdir().unwrap();
        let (mut logger, out) = quiet_logger(&dir);

        logger.append("batch ");
        logger.log_data("rows", 12).unwrap();

        assert_eq!(out.lines(), vec!["data|batch rows=12"]);
    }

    #[test]
    fn builder_defaults_match_construction() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(dir.path().join("test.log"));

        assert_eq!(logger.routing(), &Routing::default());
        assert_eq!(logger.options(), &Options::default());
        assert_eq!(logger.tags(), &TagTable::default());
        assert!(logger.file_writable());
    }

    #[test]
    fn custom_formatter_is_used() {
        struct Shouting;

        impl LogFormatter for Shouting {
            fn format(&self, level: Level, body: &str) -> Result<String> {
                Ok(format!("{}! {}", level, body.to_uppercase()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let out = MemorySink::new();
        let mut logger = Logger::builder(dir.path().join("test.log"))
            .with_stdout_sink(out.clone())
            .with_formatter(|_, _| -> Box<dyn LogFormatter> { Box::new(Shouting) })
            .build()
            .unwrap();

        logger.log_message("quiet please").unwrap();
        assert_eq!(out.lines(), vec!["info! QUIET PLEASE"]);
    }

    #[test]
    fn pedantic_logger_with_invalid_routing_refuses_to_commit() {
        let dir = tempfile::tempdir().unwrap();
        let out = MemorySink::new();
        let err = MemorySink::new();
        let mut logger = Logger::builder(dir.path().join("test.log"))
            .pedantic()
            .without_timestamp()
            .with_routing(Routing {
                default_targets: vec![Target::Stdout, Target::from("pager")],
                ..Routing::default()
            })
            .with_stdout_sink(out.clone())
            .with_stderr_sink(err.clone())
            .assemble();

        let result = logger.log_message("never shown");

        assert!(result.is_err_and(|e| e.is_configuration()));
        assert_eq!(logger.buffer(), "");
        assert!(out.lines().is_empty());
        assert!(err.lines().is_empty());
    }
}
