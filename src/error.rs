use std::{fmt, io, path::PathBuf};

use crate::logging::{Level, Target, Violation};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a logger operation can report instead of success.
///
/// None of these are fatal to the logger: each one is raised after the
/// message has been squelched (or after a warning on the diagnostic channel),
/// so callers only need to inspect them if they want to react.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid logger configuration: {0}")]
    Configuration(Violations),

    #[error("no tag configured for level {level:?}")]
    Format { level: Level },

    #[error("could not write to {target}: {reason}")]
    SinkWrite { target: Target, reason: SinkFailure },

    #[error("unknown log level: {0}")]
    UnknownLevel(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SinkFailure {
    #[error("\"{0}\" is not writeable, message squelched")]
    NotWritable(PathBuf),

    #[error("\"{path}\" used to be writeable but is not anymore, message squelched")]
    BecameUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no such destination, message squelched")]
    UnrecognizedTarget,
}

/// Non-empty list of problems found by a single validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl Error {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }

    pub fn is_sink_write(&self) -> bool {
        matches!(self, Error::SinkWrite { .. })
    }
}
