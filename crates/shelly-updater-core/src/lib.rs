//! Shared core library for Shelly device discovery and firmware updates.
//!
//! Discovery browses mDNS for `_http._tcp` services, the update module drives
//! the per-device update sequences, and the device module talks HTTP to the
//! devices themselves.

pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod protocol;
pub mod update;

pub use config::{Credentials, GenerationFilter, Stage, UpdatePolicy, UpdaterConfig};
pub use error::{CoreError, DeviceError, DiscoveryError, Result};
pub use protocol::Generation;
