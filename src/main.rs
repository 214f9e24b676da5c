mod backend;
mod cli;
mod core;
mod logging;
mod toast;
mod tui;
mod view;

use clap::Parser;

use crate::cli::{AppConfig, Cli};
use crate::core::error::JobCardError;

fn main() {
    let config = AppConfig::from(Cli::parse());
    if let Err(err) = run(&config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(config: &AppConfig) -> Result<(), JobCardError> {
    let _log_guard = logging::init(&config.log_file)?;
    let lookup = config.build_lookup()?;
    let result = tui::run(config, lookup);
    if let Err(err) = &result {
        tracing::error!(error = %err, "dashboard exited with an error");
    }
    result
}
