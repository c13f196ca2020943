use std::{fmt::Display, path::PathBuf};

use clap::{Parser, Subcommand};
use eyre::Context;
use log::LevelFilter;
use tierlog::diagnostics;

use crate::config::{ConfigManager, LocalConfigManager};

mod demo;
mod info;
mod write;

#[derive(Subcommand, Debug)]
pub enum TierlogCmd {
    Demo(demo::Cmd),

    Log(write::Cmd),

    Info(info::Cmd),
}

impl Display for TierlogCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TierlogCmd::Demo(_cmd) => write!(f, "demo"),
            TierlogCmd::Log(cmd) => write!(f, "log {}", cmd.level),
            TierlogCmd::Info(_cmd) => write!(f, "info"),
        }
    }
}

#[derive(Parser)]
#[command(version, long_version = "")]
#[command(about = "Write leveled log messages to stdout, stderr or a file.", long_about = None, disable_help_subcommand = true)]
pub struct Tierlog {
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "Show more diagnostics on stderr. Warnings are always shown.",
        display_order = 999
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: TierlogCmd,
}

impl Tierlog {
    fn log_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            3_u8..=u8::MAX => LevelFilter::Trace,
        }
    }

    fn setup_logging(&self) -> eyre::Result<()> {
        diagnostics::Builder::new()
            .with_level(self.log_filter())
            .with_stderr_sink()
            .init()
            .context("Failed setting up diagnostics")
    }

    pub fn run(self) -> eyre::Result<()> {
        self.setup_logging()?;

        log::debug!(target: "tierlog", "running command {}", &self.cmd);
        log::trace!(target: "tierlog", "diagnostic level: {}", self.log_filter());

        let config = LocalConfigManager::new();
        let result = match &self.cmd {
            TierlogCmd::Demo(demo) => demo.run(&config),
            TierlogCmd::Log(write) => write.run(&config),
            TierlogCmd::Info(info) => info.run(&config),
        };

        if let Err(msg) = &result {
            log::debug!(target: "tierlog", "failed running command {}, error={} cause={}", &self.cmd, msg, msg.root_cause());
        }

        result
    }
}

/// Uses the explicit path when given, the per-user data dir otherwise.
fn resolve_log_path(file: Option<&PathBuf>, config: &impl ConfigManager) -> eyre::Result<PathBuf> {
    match file {
        Some(path) => Ok(path.clone()),
        None => config.get_log_path(),
    }
}
