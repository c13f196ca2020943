use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use super::{LogSink, Target};
use crate::error::{Error, Result, SinkFailure};

/// The log file a logger was built for.
///
/// Writability is probed once on construction and cached; every write opens
/// the file in append mode again and flips the cache off when that fails.
pub struct FileSink {
    path: PathBuf,
    writable: bool,
}

impl FileSink {
    /// Probes `path` by opening and closing it. With `append == false` the
    /// probe truncates existing contents.
    pub fn open(path: impl Into<PathBuf>, append: bool) -> Self {
        let path = path.into();
        let probe = if append {
            OpenOptions::new().create(true).append(true).open(&path)
        } else {
            File::create(&path)
        };

        let writable = match probe {
            Ok(_) => true,
            Err(err) => {
                log::warn!(
                    target: "tierlog",
                    "could not write to \"{}\" ({}), logs targeting this file will be squelched instead",
                    path.display(),
                    err
                );
                false
            }
        };

        Self { path, writable }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    fn append_line(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        file.flush()
    }
}

impl LogSink for FileSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        if !self.writable {
            return Err(Error::SinkWrite {
                target: Target::File,
                reason: SinkFailure::NotWritable(self.path.clone()),
            });
        }

        self.append_line(line).map_err(|source| {
            self.writable = false;
            Error::SinkWrite {
                target: Target::File,
                reason: SinkFailure::BecameUnwritable {
                    path: self.path.clone(),
                    source,
                },
            }
        })
    }

    fn flush(&mut self) {}
}

pub struct StdoutSink {
    handle: io::Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            handle: io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        // Standard streams are treated as infallible, a closed pipe does not
        // fail the commit.
        let mut writer = self.handle.lock();
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
        Ok(())
    }

    fn flush(&mut self) {
        let _ = self.handle.lock().flush();
    }
}

pub struct StderrSink {
    handle: io::Stderr,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            handle: io::stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for StderrSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut writer = self.handle.lock();
        let _ = writeln!(writer, "{}", line);
        Ok(())
    }

    fn flush(&mut self) {
        let _ = self.handle.lock().flush();
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {}

impl NullSink {
    pub fn new() -> Self {
        Self {}
    }
}

impl LogSink for NullSink {
    fn write_line(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) {}
}

/// Keeps written lines in memory. Clones share the same buffer, so one clone
/// can be handed to a logger while another is used to read the lines back.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) {}
}

/// One sink per recognized [`Target`].
pub struct Sinks {
    stdout: Box<dyn LogSink>,
    stderr: Box<dyn LogSink>,
    squelch: NullSink,
    file: FileSink,
}

impl Sinks {
    pub fn new(stdout: Box<dyn LogSink>, stderr: Box<dyn LogSink>, file: FileSink) -> Self {
        Self {
            stdout,
            stderr,
            squelch: NullSink::new(),
            file,
        }
    }

    pub fn file(&self) -> &FileSink {
        &self.file
    }

    /// Writes `line` to `target`. A file that cannot be written and an
    /// unrecognized target both fall back to the squelch sink, emit a
    /// diagnostic and report the failure.
    pub fn write_to(&mut self, target: &Target, line: &str) -> Result<()> {
        let result = match target {
            Target::Stdout => self.stdout.write_line(line),
            Target::Stderr => self.stderr.write_line(line),
            Target::Squelch => self.squelch.write_line(line),
            Target::File => self.file.write_line(line),
            Target::Other(_) => Err(Error::SinkWrite {
                target: target.clone(),
                reason: SinkFailure::UnrecognizedTarget,
            }),
        };

        if let Err(err) = &result {
            log::warn!(target: "tierlog", "{}", err);
            self.squelch(line);
        }
        result
    }

    fn squelch(&mut self, line: &str) {
        // Single level of fallback, the squelch sink itself never falls back.
        if let Err(err) = self.squelch.write_line(line) {
            log::error!(target: "tierlog", "squelch sink failed: {}", err);
        }
    }

    pub fn flush(&mut self) {
        self.stdout.flush();
        self.stderr.flush();
    }
}
