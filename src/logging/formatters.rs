use super::{routing::Options, Level, LogFormatter, TagTable};
use crate::error::{Error, Result};

/// Renders `<timestamp><sep><tag><sep><body>`, leaving the timestamp out when
/// it is disabled.
pub struct DefaultFormatter {
    options: Options,
    tags: TagTable,
}

impl DefaultFormatter {
    pub fn new(options: Options, tags: TagTable) -> Self {
        Self { options, tags }
    }

    fn timestamp(&self) -> String {
        chrono::Local::now()
            .format(&self.options.datetime_format)
            .to_string()
    }
}

impl LogFormatter for DefaultFormatter {
    fn format(&self, level: Level, body: &str) -> Result<String> {
        let tag = self.tags.get(level).ok_or(Error::Format { level })?;
        let separator = &self.options.separator;

        let mut line = String::with_capacity(body.len() + tag.len() + 32);
        if self.options.timestamp {
            line.push_str(&self.timestamp());
            line.push_str(separator);
        }
        line.push_str(tag);
        line.push_str(separator);
        line.push_str(body);

        Ok(line)
    }
}
