//! Error types for the Shelly updater CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use shelly_updater_core::error::CoreError;
use thiserror::Error;

pub use shelly_updater_core::error::DiscoveryError;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    /// Same code clap uses for usage errors
    pub const INVALID_ARGS: i32 = 2;
    /// 128 + SIGINT
    pub const INTERRUPTED: i32 = 130;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Interrupted with {abandoned} device update(s) still running")]
    Interrupted { abandoned: usize },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::Interrupted { .. } => exit_codes::INTERRUPTED,
        }
    }
}

impl From<DiscoveryError> for CliError {
    fn from(e: DiscoveryError) -> Self {
        CliError::Core(CoreError::Discovery(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = CliError::Core(CoreError::Other("boom".to_string()));
        assert_eq!(err.exit_code(), exit_codes::GENERAL_ERROR);

        let err = CliError::InvalidArgument("--prefix must not be empty".to_string());
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);

        let err = CliError::Interrupted { abandoned: 2 };
        assert_eq!(err.exit_code(), 130);
        assert_eq!(
            err.to_string(),
            "Interrupted with 2 device update(s) still running"
        );
    }
}
