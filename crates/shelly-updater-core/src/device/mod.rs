//! Device communication layer.
//!
//! Provides the `DeviceApi` seam used by the update sequences and its HTTP
//! implementation.

pub mod client;

pub use client::{DeviceApi, HttpDeviceClient};
