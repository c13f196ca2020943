use std::path::PathBuf;

use clap::Args;
use eyre::Context;
use tierlog::{Level, Logger, Routing, Target};

use crate::config::ConfigManager;

#[derive(Args, Debug)]
pub struct Cmd {
    #[arg(index = 1, required = true, value_name = "MESSAGE")]
    pub message: Vec<String>,

    #[arg(short, long, default_value_t = Level::Info)]
    pub level: Level,

    #[arg(short, long, help = "Log file to use instead of the default one.")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "Also write normal and error messages to the log file.")]
    pub tee: bool,

    #[arg(long, value_delimiter = ',', help = "Targets for normal messages.")]
    pub to: Vec<Target>,

    #[arg(long, value_delimiter = ',', help = "Targets for error messages.")]
    pub error_to: Vec<Target>,

    #[arg(long, help = "Lowest level that is not squelched.")]
    pub squelch_below: Option<Level>,

    #[arg(long, help = "Lowest level routed to the error targets.")]
    pub error_at: Option<Level>,

    #[arg(long)]
    pub no_timestamp: bool,

    #[arg(long, help = "Refuse to log when the routing is invalid.")]
    pub pedantic: bool,

    #[arg(long, help = "Truncate the log file instead of appending to it.")]
    pub overwrite: bool,
}

impl Cmd {
    fn routing(&self) -> Routing {
        let mut routing = Routing::default();

        if !self.to.is_empty() {
            routing.default_targets = self.to.clone();
        }
        if !self.error_to.is_empty() {
            routing.error_targets = self.error_to.clone();
        }
        if self.tee {
            for targets in [&mut routing.default_targets, &mut routing.error_targets] {
                if !targets.contains(&Target::File) {
                    targets.push(Target::File);
                }
            }
        }
        if let Some(level) = self.squelch_below {
            routing.squelch_threshold = level;
        }
        if let Some(level) = self.error_at {
            routing.error_threshold = level;
        }

        routing
    }

    pub fn run(&self, config: &impl ConfigManager) -> eyre::Result<()> {
        let path = super::resolve_log_path(self.file.as_ref(), config)?;

        let mut builder = Logger::builder(&path).with_routing(self.routing());
        if self.no_timestamp {
            builder = builder.without_timestamp();
        }
        if self.pedantic {
            builder = builder.pedantic();
        }
        if self.overwrite {
            builder = builder.overwrite();
        }

        let mut log = builder.build().context("Invalid routing")?;
        log.log_message_at(self.level, self.message.join(" "))
            .with_context(|| format!("Failed logging {} message", self.level))
    }
}
