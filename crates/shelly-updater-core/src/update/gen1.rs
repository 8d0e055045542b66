//! Gen 1 update sequence (`/ota` API).

use log::{error, info, warn};
use tokio::time::sleep;

use super::UpdateOutcome;
use crate::config::UpdaterConfig;
use crate::device::DeviceApi;

pub(super) async fn run<A>(api: &A, config: &UpdaterConfig, prefix: &str, host: &str) -> UpdateOutcome
where
    A: DeviceApi + ?Sized,
{
    let stage = config.stage;
    let policy = &config.policy;

    info!("{} checking for updates...", prefix);
    if let Err(e) = api.trigger_update_check(host).await {
        warn!("{} failed to check for updates: {}, aborting...", prefix, e);
        return UpdateOutcome::failed(format!("failed to check for updates: {}", e));
    }

    // The device looks for new firmware in the background.
    sleep(policy.check_delay).await;

    let status = match api.update_status(host).await {
        Ok(status) => status,
        Err(e) => {
            warn!("{} failed to query update status: {}, aborting...", prefix, e);
            return UpdateOutcome::failed(format!("failed to query update status: {}", e));
        }
    };

    if !status.update_available(stage) {
        info!("{} already up to date ({})", prefix, status.old_version);
        return UpdateOutcome::UpToDate {
            version: Some(status.old_version),
        };
    }

    info!(
        "{} update available! ({} -> {}), updating...",
        prefix,
        status.old_version,
        status.target_version(stage)
    );

    let mut status = match api.trigger_update(host, stage).await {
        Ok(status) => status,
        Err(e) => {
            warn!("{} failed to start update: {}, aborting...", prefix, e);
            return UpdateOutcome::failed(format!("failed to start update: {}", e));
        }
    };

    let mut polls = 0;
    while status.is_updating() {
        if polls >= policy.gen1_max_polls {
            error!(
                "{} still updating after {} status checks, giving up",
                prefix, polls
            );
            return UpdateOutcome::failed(format!("still updating after {} status checks", polls));
        }
        polls += 1;

        sleep(policy.poll_interval).await;
        match api.update_status(host).await {
            Ok(next) => status = next,
            Err(e) => warn!("{} failed to query update status: {}, retrying...", prefix, e),
        }
    }

    info!("{} device updated to {}!", prefix, status.old_version);
    UpdateOutcome::Updated {
        version: status.old_version,
    }
}
