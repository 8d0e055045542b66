//! URL builders for the gen 1 and gen 2 device endpoints.
//!
//! `host` is whatever the discoverer resolved: an IPv4 address or a host name,
//! optionally with a port.

use crate::config::Stage;

/// Endpoint builders for the device HTTP API
pub struct Endpoints;

impl Endpoints {
    // ==================== Gen 1 ====================

    /// Current OTA status
    pub fn ota(host: &str) -> String {
        format!("http://{}/ota", host)
    }

    /// Start an OTA update from the given channel
    pub fn ota_update(host: &str, stage: Stage) -> String {
        match stage {
            Stage::Stable => format!("http://{}/ota?update=1", host),
            Stage::Beta => format!("http://{}/ota?beta=1", host),
        }
    }

    /// Ask the device to look for new firmware (asynchronous on the device)
    pub fn ota_check(host: &str) -> String {
        format!("http://{}/ota/check", host)
    }

    // ==================== Gen 2 ====================

    pub fn check_for_update(host: &str) -> String {
        format!("http://{}/rpc/Shelly.CheckForUpdate", host)
    }

    pub fn update(host: &str, stage: Stage) -> String {
        format!("http://{}/rpc/Shelly.Update?stage={}", host, stage)
    }
}
