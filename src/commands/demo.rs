use std::path::PathBuf;

use clap::Args;
use tierlog::{Level, Logger, Target};

use crate::config::ConfigManager;

/// Walks through every logger feature once, writing to stdout, stderr and
/// the log file.
#[derive(Args, Debug)]
pub struct Cmd {
    #[arg(short, long, help = "Log file to use instead of the default one.")]
    pub file: Option<PathBuf>,
}

impl Cmd {
    pub fn run(&self, config: &impl ConfigManager) -> eyre::Result<()> {
        let path = super::resolve_log_path(self.file.as_ref(), config)?;
        let mut log = Logger::new(&path);

        for (level, text) in [
            (Level::Info, "this is info"),
            (Level::Data, "this is data"),
            (Level::Warning, "this is a warning"),
            (Level::Error, "this is an error"),
            (Level::Fatal, "this is a fatal error"),
        ] {
            log.append(text);
            log.commit_at(level)?;
        }

        log.append("this will default to \"info\"");
        log.commit()?;

        log.append("this is an example of how to do error handling");
        if let Err(err) = log.commit() {
            println!("ERROR: failed committing log message: {}", err);
        }

        log.log_data("foo", 10)?;
        log.log_message("that was an example of log_data")?;
        log.log_data("bar", 10.75f32)?;
        log.log_message("that was another example of log_data, this time with a float")?;

        log.set_default_targets(vec![Target::Stdout, Target::File])?;
        log.append("this message will also go to ");
        log.append(path.display().to_string());
        log.commit()?;
        log.flush();

        Ok(())
    }
}
