//! Gen 2 update sequence (`Shelly.CheckForUpdate` / `Shelly.Update` RPC).

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
    let updates = match api.check_for_update(host).await {
        Ok(updates) => updates,
        Err(e) => {
            warn!("{} failed to check for updates: {}, aborting...", prefix, e);
            return UpdateOutcome::failed(format!("failed to check for updates: {}", e));
        }
    };

    let target = match updates.offered_version(stage) {
        Some(version) => version.to_string(),
        None => {
            info!("{} already up to date", prefix);
            return UpdateOutcome::UpToDate { version: None };
        }
    };

    info!("{} updating to version {}...", prefix, target);
    if let Err(e) = api.start_update(host, stage).await {
        warn!("{} failed to update: {}, aborting...", prefix, e);
        return UpdateOutcome::failed(format!("failed to update: {}", e));
    }

    // The offer disappears from the channel once the new firmware runs.
    let mut attempts = 0;
    let mut pending = true;
    while pending {
        attempts += 1;
        if attempts > policy.gen2_max_attempts {
            let reason = format!(
                "update to {} not confirmed after {} checks",
                target, policy.gen2_max_attempts
            );
            error!("{} failed to check if update completed successfully: {}", prefix, reason);
            return UpdateOutcome::failed(reason);
        }

        sleep(policy.poll_interval).await;
        match api.check_for_update(host).await {
            Ok(updates) => pending = updates.offered_version(stage).is_some(),
            Err(e) => warn!("{} failed to query update status: {}, retrying...", prefix, e),
        }
    }

    info!("{} device updated to {}!", prefix, target);
    UpdateOutcome::Updated { version: target }
}
