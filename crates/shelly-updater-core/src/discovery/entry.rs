//! Discovered services and the filter that decides which ones get updated.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::protocol::Generation;

/// A resolved `_http._tcp` service that may be a Shelly device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    /// Instance name, e.g. `shellyplus1pm-a8032ab12345`
    pub name: String,
    /// IPv4 address when one was resolved, host name otherwise
    pub address: String,
    /// Raw TXT records as `key=value` strings
    pub txt_records: Vec<String>,
}

impl DeviceEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>, txt_records: Vec<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            txt_records,
        }
    }

    pub fn generation(&self) -> Generation {
        Generation::from_txt_records(&self.txt_records)
    }

    /// Case-insensitive prefix match on the instance name.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.name
            .to_lowercase()
            .starts_with(&prefix.to_lowercase())
    }
}

/// Strip the service type from a full service name.
///
/// `shelly1-ABC._http._tcp.local.` becomes `shelly1-ABC`.
pub fn instance_name<'a>(fullname: &'a str, service_type: &str) -> &'a str {
    fullname
        .strip_suffix(service_type)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(fullname)
}

/// Pick the address to talk to: the lowest IPv4 address, else the host name.
///
/// IPv6 is ignored, Shelly devices only partly support it.
pub fn select_address<I>(ipv4: I, hostname: &str) -> String
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    match ipv4.into_iter().min() {
        Some(addr) => addr.to_string(),
        None => hostname.trim_end_matches('.').to_string(),
    }
}

/// Admits each matching device once.
///
/// mDNS responders re-announce themselves, so the same service is usually
/// resolved several times during a scan.
#[derive(Debug)]
pub struct EntryFilter {
    prefix: String,
    seen: HashSet<String>,
}

impl EntryFilter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            seen: HashSet::new(),
        }
    }

    /// True the first time a matching entry is offered.
    pub fn admit(&mut self, entry: &DeviceEntry) -> bool {
        entry.matches_prefix(&self.prefix) && self.seen.insert(entry.name.to_lowercase())
    }

    pub fn admitted(&self) -> usize {
        self.seen.len()
    }
}
