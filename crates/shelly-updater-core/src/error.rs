//! Error types for the Shelly updater core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while talking to a single device.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("request to {url} failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("unexpected status code: {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// mDNS discovery errors. Both are fatal to a scan.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to initialize resolver: {0}")]
    Resolver(#[source] mdns_sd::Error),

    #[error("Failed to browse {service_type}: {source}")]
    Browse {
        service_type: String,
        #[source]
        source: mdns_sd::Error,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_display() {
        let err = DeviceError::UnexpectedStatus {
            url: "http://10.0.0.5/ota".to_string(),
            status: 401,
        };
        assert_eq!(format!("{}", err), "unexpected status code: 401");
    }

    #[test]
    fn test_core_error_from_device_error() {
        let err: CoreError = DeviceError::InvalidResponse {
            url: "http://10.0.0.5/ota".to_string(),
            message: "expected value".to_string(),
        }
        .into();
        assert!(format!("{}", err).starts_with("Device error: invalid response"));
    }
}
