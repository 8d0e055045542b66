//! Shelly updater - discovers Shelly devices over mDNS and updates their firmware.
//!
//! Every device found during the scan is updated concurrently; the process
//! exits once all of them have finished.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use cli::Cli;
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    commands::run_update(cli).await
}
