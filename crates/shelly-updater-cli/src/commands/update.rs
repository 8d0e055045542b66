//! Scan the network and update every Shelly device found.

use std::sync::Arc;

use log::{info, warn};

use shelly_updater_core::device::{DeviceApi, HttpDeviceClient};
use shelly_updater_core::discovery::DiscoveryService;
use shelly_updater_core::update::{JoinResult, UpdateOrchestrator};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the scan-and-update command
pub async fn run_update(cli: Cli) -> Result<(), CliError> {
    if cli.prefix.trim().is_empty() {
        return Err(CliError::InvalidArgument(
            "--prefix must not be empty".to_string(),
        ));
    }

    let config = Arc::new(cli.updater_config());
    let options = cli.scan_options();
    let formatter = get_formatter(cli.json);

    if let Some((username, _)) = config.credentials.basic_auth() {
        info!("Using basic authentication: {}:*******", username);
    }

    let api: Arc<dyn DeviceApi> = Arc::new(HttpDeviceClient::new(
        config.credentials.clone(),
        config.request_timeout,
    )?);
    let mut orchestrator = UpdateOrchestrator::new(api, Arc::clone(&config));

    let scan_secs = options.timeout.as_secs();
    let service = DiscoveryService::browse(options)?;
    info!(
        "[scanner] looking for Shelly devices using mDNS ({}s timeout)...",
        scan_secs
    );

    let found = service
        .run(shutdown_signal(), |entry| orchestrator.spawn(entry))
        .await;

    info!(
        "[scanner] scanning process finished, waiting for {} of {} device(s)",
        orchestrator.in_flight(),
        found
    );

    // Ctrl+C from here on abandons the updates still in flight.
    match orchestrator.join_until(shutdown_signal()).await {
        JoinResult::Completed(reports) => {
            println!("{}", formatter.format_reports(&reports));
            Ok(())
        }
        JoinResult::Interrupted {
            finished,
            abandoned,
        } => {
            println!("{}", formatter.format_reports(&finished));
            Err(CliError::Interrupted { abandoned })
        }
    }
}

/// Resolves on Ctrl+C. Never resolves if the signal handler can't be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
