mod formatters;
mod level;
mod logger;
mod routing;
mod sinks;
mod target;
mod value;

pub use formatters::DefaultFormatter;
pub use level::{Level, TagTable};
pub use logger::{Builder, Logger};
pub use routing::{Options, Routing, Threshold, Tier, Violation};
pub use sinks::{FileSink, MemorySink, NullSink, Sinks, StderrSink, StdoutSink};
pub use target::Target;
pub use value::LogValue;

use crate::error::Result;

pub trait LogFormatter: Send {
    fn format(&self, level: Level, body: &str) -> Result<String>;
}

pub trait LogSink: Send {
    fn write_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self);
}
