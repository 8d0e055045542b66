//! mDNS device discovery module.
//!
//! Provides the discovered-entry model, the name/duplicate filter and the
//! browsing service built on `mdns-sd`.

pub mod entry;
pub mod service;

pub use entry::{DeviceEntry, EntryFilter};
pub use service::{DiscoveryService, ScanOptions};
