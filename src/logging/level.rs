use std::{fmt, str::FromStr};

use crate::Error;

/// Severity of a committed message. Ordering drives routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Info,
    Data,
    Warning,
    Error,
    Fatal,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Info,
        Level::Data,
        Level::Warning,
        Level::Error,
        Level::Fatal,
    ];

    /// Distance from [`Level::Info`], used to index the tag table.
    pub fn offset(self) -> usize {
        self as usize
    }

    fn default_tag(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Data => "data",
            Level::Warning => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_tag())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "data" => Ok(Level::Data),
            "warn" | "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            _ => Err(Error::UnknownLevel(s.to_string())),
        }
    }
}

/// Human readable tags, one per level, indexed by [`Level::offset`].
///
/// A table shorter than [`Level::ALL`] is allowed to exist; looking up a level
/// past its end yields `None`, which the formatter reports as an unknown level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTable {
    tags: Vec<String>,
}

impl TagTable {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, level: Level) -> Option<&str> {
        self.tags.get(level.offset()).map(String::as_str)
    }

    pub fn contains(&self, level: Level) -> bool {
        level.offset() < self.tags.len()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagTable {
    fn default() -> Self {
        Self::new(Level::ALL.iter().map(|level| level.default_tag()))
    }
}
