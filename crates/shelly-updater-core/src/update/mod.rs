//! Per-device update orchestration.
//!
//! Every discovered device gets its own task. The task picks the sequence for
//! the device's generation, runs it to the end and reports the outcome. A
//! failing device never affects the others.

mod gen1;
mod gen2;
#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use serde::Serialize;
use tokio::task::JoinSet;

use crate::config::UpdaterConfig;
use crate::device::DeviceApi;
use crate::discovery::DeviceEntry;
use crate::protocol::Generation;

/// How a device's update sequence ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Nothing newer on the selected channel
    UpToDate { version: Option<String> },
    /// Update finished; `version` is the firmware now running
    Updated { version: String },
    /// Excluded by the generation filter
    Skipped,
    Failed { reason: String },
}

impl UpdateOutcome {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        UpdateOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UpdateOutcome::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpdateOutcome::UpToDate { .. } => "up to date",
            UpdateOutcome::Updated { .. } => "updated",
            UpdateOutcome::Skipped => "skipped",
            UpdateOutcome::Failed { .. } => "failed",
        }
    }
}

/// Final report for one device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub name: String,
    pub address: String,
    pub generation: Generation,
    #[serde(flatten)]
    pub outcome: UpdateOutcome,
    pub finished_at: DateTime<Utc>,
}

/// Log prefix identifying a device, e.g. `[shelly1-abc/10.0.0.4/gen1]`.
pub(crate) fn log_prefix(entry: &DeviceEntry, generation: Generation) -> String {
    format!("[{}/{}/{}]", entry.name, entry.address, generation)
}

/// Run the update sequence matching the device's generation.
pub async fn update_device<A>(api: &A, config: &UpdaterConfig, entry: &DeviceEntry) -> DeviceReport
where
    A: DeviceApi + ?Sized,
{
    let generation = entry.generation();
    let prefix = log_prefix(entry, generation);

    let outcome = if !config.generations.allows(generation) {
        debug!("{} excluded by generation filter", prefix);
        UpdateOutcome::Skipped
    } else {
        match generation {
            Generation::Gen1 => gen1::run(api, config, &prefix, &entry.address).await,
            Generation::Gen2 => gen2::run(api, config, &prefix, &entry.address).await,
        }
    };

    DeviceReport {
        name: entry.name.clone(),
        address: entry.address.clone(),
        generation,
        outcome,
        finished_at: Utc::now(),
    }
}

/// Spawns one update task per device and waits for all of them.
pub struct UpdateOrchestrator {
    api: Arc<dyn DeviceApi>,
    config: Arc<UpdaterConfig>,
    tasks: JoinSet<DeviceReport>,
}

impl UpdateOrchestrator {
    pub fn new(api: Arc<dyn DeviceApi>, config: Arc<UpdaterConfig>) -> Self {
        Self {
            api,
            config,
            tasks: JoinSet::new(),
        }
    }

    /// Start updating `entry` in the background.
    pub fn spawn(&mut self, entry: DeviceEntry) {
        let api = Arc::clone(&self.api);
        let config = Arc::clone(&self.config);
        self.tasks
            .spawn(async move { update_device(api.as_ref(), &config, &entry).await });
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every spawned task and collect the reports.
    pub async fn join_all(self) -> Vec<DeviceReport> {
        match self.join_until(std::future::pending()).await {
            JoinResult::Completed(reports) => reports,
            JoinResult::Interrupted { finished, .. } => finished,
        }
    }

    /// Wait for every spawned task unless `cancel` completes first, in which
    /// case the remaining tasks are aborted.
    pub async fn join_until<C>(mut self, cancel: C) -> JoinResult
    where
        C: Future<Output = ()>,
    {
        let mut reports = Vec::with_capacity(self.tasks.len());
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                next = self.tasks.join_next() => match next {
                    Some(Ok(report)) => reports.push(report),
                    Some(Err(e)) => error!("device update task failed: {}", e),
                    None => break,
                },
                _ = &mut cancel => {
                    let abandoned = self.tasks.len();
                    warn!("interrupted, abandoning {} device update(s)", abandoned);
                    self.tasks.abort_all();
                    sort_reports(&mut reports);
                    return JoinResult::Interrupted {
                        finished: reports,
                        abandoned,
                    };
                }
            }
        }

        sort_reports(&mut reports);
        JoinResult::Completed(reports)
    }
}

/// How waiting for the device tasks ended.
#[derive(Debug)]
pub enum JoinResult {
    Completed(Vec<DeviceReport>),
    /// Cancelled while `abandoned` tasks were still running
    Interrupted {
        finished: Vec<DeviceReport>,
        abandoned: usize,
    },
}

fn sort_reports(reports: &mut [DeviceReport]) {
    reports.sort_by(|a, b| a.name.cmp(&b.name));
}
