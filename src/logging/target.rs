use std::fmt;

/// Named output destination for formatted messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Stdout,
    Stderr,
    /// Discards everything written to it.
    Squelch,
    /// The file the logger was constructed with.
    File,
    /// A target name that did not resolve to any known destination.
    Other(String),
}

impl Target {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Target::Other(_))
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "stdout" => Target::Stdout,
            "stderr" => Target::Stderr,
            "squelch" | "null" => Target::Squelch,
            "file" => Target::File,
            _ => Target::Other(name.to_string()),
        }
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::from(name.as_str())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Stdout => f.write_str("stdout"),
            Target::Stderr => f.write_str("stderr"),
            Target::Squelch => f.write_str("squelch"),
            Target::File => f.write_str("file"),
            Target::Other(name) => write!(f, "unrecognized target \"{}\"", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names() {
        assert_eq!(Target::from("stdout"), Target::Stdout);
        assert_eq!(Target::from("STDERR"), Target::Stderr);
        assert_eq!(Target::from("squelch"), Target::Squelch);
        assert_eq!(Target::from("file"), Target::File);
    }

    #[test]
    fn unknown_names_are_kept_but_unrecognized() {
        let target = Target::from("syslog");
        assert_eq!(target, Target::Other("syslog".to_string()));
        assert!(!target.is_recognized());
        assert!(Target::Squelch.is_recognized());
    }
}
