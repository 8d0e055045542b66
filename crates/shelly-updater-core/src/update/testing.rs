//! Scripted `DeviceApi` fake for the update sequence tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::Stage;
use crate::device::DeviceApi;
use crate::error::DeviceError;
use crate::protocol::{CheckForUpdateResponse, UpdateCheckResponse, UpdateStatus};

type Script<T> = Mutex<VecDeque<Result<T, DeviceError>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    UpdateCheck,
    Status,
    Trigger(Stage),
    CheckForUpdate,
    StartUpdate(Stage),
}

/// Answers each endpoint from its own queue and records every call.
#[derive(Default)]
pub(crate) struct ScriptedDevice {
    calls: Mutex<Vec<(String, Call)>>,
    update_checks: Script<UpdateCheckResponse>,
    statuses: Script<UpdateStatus>,
    triggers: Script<UpdateStatus>,
    checks_for_update: Script<CheckForUpdateResponse>,
    starts: Script<()>,
}

pub(crate) fn transient_error() -> DeviceError {
    DeviceError::RequestFailed {
        url: "http://10.0.0.1/".to_string(),
        message: "connection reset".to_string(),
    }
}

fn next<T>(script: &Script<T>, call: &Call) -> Result<T, DeviceError> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("no scripted response left for {:?}", call))
}

impl ScriptedDevice {
    pub fn push_update_check(&self, r: Result<UpdateCheckResponse, DeviceError>) {
        self.update_checks.lock().unwrap().push_back(r);
    }

    pub fn push_status(&self, r: Result<UpdateStatus, DeviceError>) {
        self.statuses.lock().unwrap().push_back(r);
    }

    pub fn push_trigger(&self, r: Result<UpdateStatus, DeviceError>) {
        self.triggers.lock().unwrap().push_back(r);
    }

    pub fn push_check_for_update(&self, r: Result<CheckForUpdateResponse, DeviceError>) {
        self.checks_for_update.lock().unwrap().push_back(r);
    }

    pub fn push_start_update(&self, r: Result<(), DeviceError>) {
        self.starts.lock().unwrap().push_back(r);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(h, _)| h.clone()).collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|(_, c)| c == call).count()
    }

    fn record(&self, host: &str, call: Call) -> Call {
        self.calls.lock().unwrap().push((host.to_string(), call.clone()));
        call
    }
}

#[async_trait]
impl DeviceApi for ScriptedDevice {
    async fn trigger_update_check(&self, host: &str) -> Result<UpdateCheckResponse, DeviceError> {
        let call = self.record(host, Call::UpdateCheck);
        next(&self.update_checks, &call)
    }

    async fn update_status(&self, host: &str) -> Result<UpdateStatus, DeviceError> {
        let call = self.record(host, Call::Status);
        next(&self.statuses, &call)
    }

    async fn trigger_update(&self, host: &str, stage: Stage) -> Result<UpdateStatus, DeviceError> {
        let call = self.record(host, Call::Trigger(stage));
        next(&self.triggers, &call)
    }

    async fn check_for_update(&self, host: &str) -> Result<CheckForUpdateResponse, DeviceError> {
        let call = self.record(host, Call::CheckForUpdate);
        next(&self.checks_for_update, &call)
    }

    async fn start_update(&self, host: &str, stage: Stage) -> Result<(), DeviceError> {
        let call = self.record(host, Call::StartUpdate(stage));
        next(&self.starts, &call)
    }
}
