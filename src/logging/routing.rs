use std::fmt;

use super::{Level, TagTable, Target};
use crate::error::{Error, Result, Violations};

/// Severity band a committed message falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Squelch,
    Normal,
    Error,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Squelch => f.write_str("squelch"),
            Tier::Normal => f.write_str("default"),
            Tier::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Error,
    Squelch,
}

/// One problem found by [`Routing::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    UnrecognizedTarget { tier: Tier, target: Target },
    UntaggedThreshold { threshold: Threshold, level: Level },
    /// The tag table does not have exactly one tag per level.
    TagCount { expected: usize, found: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnrecognizedTarget { tier, target } => {
                write!(f, "{} targets contain an {}", tier, target)
            }
            Violation::UntaggedThreshold { threshold, level } => {
                let name = match threshold {
                    Threshold::Error => "error",
                    Threshold::Squelch => "squelch",
                };
                write!(f, "{} threshold {:?} has no tag", name, level)
            }
            Violation::TagCount { expected, found } => {
                write!(f, "tag table has {} tags, expected {}", found, expected)
            }
        }
    }
}

/// Which targets receive a message, decided by its level.
///
/// Levels at or above `error_threshold` go to `error_targets`, levels below
/// `squelch_threshold` go to `squelch_targets`, everything in between goes to
/// `default_targets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub default_targets: Vec<Target>,
    pub error_threshold: Level,
    pub error_targets: Vec<Target>,
    pub squelch_threshold: Level,
    pub squelch_targets: Vec<Target>,
}

impl Default for Routing {
    fn default() -> Self {
        Self {
            default_targets: vec![Target::Stdout],
            error_threshold: Level::Warning,
            error_targets: vec![Target::Stderr],
            squelch_threshold: Level::Info,
            squelch_targets: vec![Target::Squelch],
        }
    }
}

impl Routing {
    /// Picks the tier for `level`.
    ///
    /// When the thresholds are inverted (`squelch_threshold > error_threshold`)
    /// the error tier wins, so error-level messages are never squelched.
    pub fn tier_for(&self, level: Level) -> Tier {
        if level >= self.error_threshold {
            Tier::Error
        } else if level < self.squelch_threshold {
            Tier::Squelch
        } else {
            Tier::Normal
        }
    }

    pub fn targets(&self, tier: Tier) -> &[Target] {
        match tier {
            Tier::Squelch => &self.squelch_targets,
            Tier::Normal => &self.default_targets,
            Tier::Error => &self.error_targets,
        }
    }

    pub fn thresholds_inverted(&self) -> bool {
        self.squelch_threshold > self.error_threshold
    }

    /// Checks every target list, both thresholds and the size of the tag
    /// table, reporting all problems at once. Threshold order is not checked, see [`Routing::tier_for`].
    pub fn validate(&self, tags: &TagTable) -> Result<()> {
        let mut violations = Vec::new();

        for tier in [Tier::Normal, Tier::Error, Tier::Squelch] {
            violations.extend(
                self.targets(tier)
                    .iter()
                    .filter(|target| !target.is_recognized())
                    .map(|target| Violation::UnrecognizedTarget {
                        tier,
                        target: target.clone(),
                    }),
            );
        }

        for (threshold, level) in [
            (Threshold::Error, self.error_threshold),
            (Threshold::Squelch, self.squelch_threshold),
        ] {
            if !tags.contains(level) {
                violations.push(Violation::UntaggedThreshold { threshold, level });
            }
        }

        if tags.len() != Level::ALL.len() {
            violations.push(Violation::TagCount {
                expected: Level::ALL.len(),
                found: tags.len(),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration(Violations(violations)))
        }
    }
}

/// Per-instance policy, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Refuse to commit (and refuse invalid setter values) when validation
    /// fails, instead of warning and carrying on.
    pub pedantic: bool,
    pub timestamp: bool,
    /// Keep existing file contents when the logger is created. When false the
    /// file is truncated by the construction probe.
    pub append: bool,
    pub separator: String,
    pub datetime_format: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pedantic: false,
            timestamp: true,
            append: true,
            separator: "|".to_string(),
            datetime_format: "%Y:%m:%d:%H:%M:%S".to_string(),
        }
    }
}
