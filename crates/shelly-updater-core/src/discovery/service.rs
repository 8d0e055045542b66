//! mDNS browsing service.
//!
//! Browses for `_http._tcp.local.` until the scan deadline and hands every
//! newly seen Shelly entry to a callback.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use log::{debug, info, warn};
use mdns_sd::{IfKind, Receiver, ServiceDaemon, ServiceEvent, ServiceInfo};

use super::entry::{instance_name, select_address, DeviceEntry, EntryFilter};
use crate::error::DiscoveryError;

/// Service type Shelly devices advertise their web interface under
pub const SERVICE_TYPE: &str = "_http._tcp.local.";

/// Instance name prefix of Shelly devices
pub const DEFAULT_NAME_PREFIX: &str = "shelly";

/// How long to browse before giving up on new devices
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(60);

/// Scan options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Fully qualified service type to browse
    pub service_type: String,
    /// Case-insensitive instance name prefix
    pub name_prefix: String,
    /// Scan duration
    pub timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            service_type: SERVICE_TYPE.to_string(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            timeout: DEFAULT_SCAN_TIMEOUT,
        }
    }
}

impl DeviceEntry {
    /// Build an entry from a resolved mDNS service.
    pub fn from_service_info(info: &ServiceInfo, service_type: &str) -> Self {
        let ipv4 = info.get_addresses().iter().filter_map(|ip| match ip {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(_) => None,
        });

        let txt_records = info
            .get_properties()
            .iter()
            .map(|p| format!("{}={}", p.key(), p.val_str()))
            .collect();

        DeviceEntry {
            name: instance_name(info.get_fullname(), service_type).to_string(),
            address: select_address(ipv4, info.get_hostname()),
            txt_records,
        }
    }
}

/// An active mDNS browse.
pub struct DiscoveryService {
    daemon: ServiceDaemon,
    events: Receiver<ServiceEvent>,
    options: ScanOptions,
}

impl DiscoveryService {
    /// Start the mDNS daemon on IPv4 interfaces and begin browsing.
    pub fn browse(options: ScanOptions) -> Result<Self, DiscoveryError> {
        let daemon = ServiceDaemon::new().map_err(DiscoveryError::Resolver)?;
        // An IPv6-only first resolution would pin the device to its host name.
        daemon
            .disable_interface(IfKind::IPv6)
            .map_err(DiscoveryError::Resolver)?;
        let events = daemon
            .browse(&options.service_type)
            .map_err(|source| DiscoveryError::Browse {
                service_type: options.service_type.clone(),
                source,
            })?;

        Ok(Self {
            daemon,
            events,
            options,
        })
    }

    /// Browse until the scan timeout elapses or `cancel` completes, calling
    /// `on_entry` once per matching device. Returns the number of devices
    /// handed out.
    pub async fn run<C, F>(self, cancel: C, mut on_entry: F) -> usize
    where
        C: Future<Output = ()>,
        F: FnMut(DeviceEntry),
    {
        let mut filter = EntryFilter::new(self.options.name_prefix.as_str());
        let deadline = tokio::time::sleep(self.options.timeout);
        tokio::pin!(deadline);
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = &mut cancel => {
                    info!("[scanner] scan cancelled");
                    break;
                }
                event = self.events.recv_async() => match event {
                    Ok(ServiceEvent::ServiceResolved(info)) => {
                        let entry = DeviceEntry::from_service_info(&info, &self.options.service_type);
                        if filter.admit(&entry) {
                            debug!("[scanner] found {} at {} ({:?})", entry.name, entry.address, entry.txt_records);
                            on_entry(entry);
                        }
                    }
                    Ok(other) => debug!("[scanner] {:?}", other),
                    Err(e) => {
                        warn!("[scanner] mDNS event channel closed: {}", e);
                        break;
                    }
                },
            }
        }

        self.stop();
        filter.admitted()
    }

    fn stop(&self) {
        if let Err(e) = self.daemon.stop_browse(&self.options.service_type) {
            debug!("[scanner] failed to stop browsing: {}", e);
        }
        if let Err(e) = self.daemon.shutdown() {
            warn!("[scanner] failed to shut down mDNS daemon: {}", e);
        }
    }
}
