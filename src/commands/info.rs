use clap::{Args, CommandFactory};

use crate::{commands::Tierlog, config::ConfigManager};

#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cmd {}

impl Cmd {
    pub fn run(&self, config: &impl ConfigManager) -> eyre::Result<()> {
        println!(
            "Version:        {}",
            Tierlog::command().get_version().unwrap_or("")
        );
        println!(
            "Default log:    {}",
            config
                .get_log_path()
                .map(|path| path.display().to_string())
                .unwrap_or_default()
        );
        Ok(())
    }
}
