//! Leveled logging with threshold-based routing.
//!
//! Text is buffered on a [`Logger`], tagged with a [`Level`] on commit and
//! written to every [`Target`] of the tier that level falls into:
//!
//! ```no_run
//! use tierlog::{Level, Logger, Target};
//!
//! let mut log = Logger::new("app.log");
//! log.append("cache warmed");
//! log.commit().ok();
//!
//! log.set_default_targets(vec![Target::Stdout, Target::File]).ok();
//! log.log_data("retries", 3).ok();
//! log.log_message_at(Level::Error, "upstream unreachable").ok();
//! ```

pub mod diagnostics;
mod error;
pub mod logging;

pub use error::{Error, Result, SinkFailure, Violations};
pub use logging::{
    Builder, Level, LogValue, Logger, MemorySink, Options, Routing, TagTable, Target, Tier,
};
