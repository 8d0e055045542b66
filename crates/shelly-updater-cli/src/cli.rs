//! CLI argument definitions using clap.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use shelly_updater_core::config::{
    Credentials, GenerationFilter, Stage, UpdatePolicy, UpdaterConfig,
};
use shelly_updater_core::discovery::service::{ScanOptions, DEFAULT_NAME_PREFIX, SERVICE_TYPE};

/// Discover Shelly devices on the local network and update their firmware
#[derive(Parser, Debug)]
#[command(name = "shelly-updater")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Username to use for authentication
    #[arg(long, default_value = "admin", env = "SHELLY_USERNAME")]
    pub username: String,

    /// Password to use for authentication (basic auth is only sent when set)
    #[arg(long, default_value = "", env = "SHELLY_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Firmware channel to update from
    #[arg(long, value_enum, default_value = "stable")]
    pub stage: StageArg,

    /// Device generation to update (0 = all)
    #[arg(long = "gen", default_value = "0", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub generation: u8,

    /// How long to scan for devices, in seconds
    #[arg(long, default_value = "60")]
    pub scan_timeout: u64,

    /// HTTP request timeout in milliseconds
    #[arg(long, default_value = "10000", env = "SHELLY_TIMEOUT")]
    pub timeout: u64,

    /// Only update devices whose mDNS instance name starts with this (case-insensitive)
    #[arg(long, default_value = DEFAULT_NAME_PREFIX)]
    pub prefix: String,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageArg {
    Stable,
    Beta,
}

impl From<StageArg> for Stage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Stable => Stage::Stable,
            StageArg::Beta => Stage::Beta,
        }
    }
}

impl Cli {
    pub fn updater_config(&self) -> UpdaterConfig {
        UpdaterConfig {
            credentials: Credentials::new(self.username.as_str(), self.password.as_str()),
            stage: self.stage.into(),
            // range-checked by clap
            generations: GenerationFilter::from_number(self.generation).unwrap_or_default(),
            request_timeout: Duration::from_millis(self.timeout),
            policy: UpdatePolicy::default(),
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            service_type: SERVICE_TYPE.to_string(),
            name_prefix: self.prefix.clone(),
            timeout: Duration::from_secs(self.scan_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind;
    use shelly_updater_core::Generation;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["shelly-updater"]).unwrap();
        assert_eq!(cli.username, "admin");
        assert_eq!(cli.password, "");
        assert_eq!(cli.stage, StageArg::Stable);
        assert_eq!(cli.generation, 0);

        let config = cli.updater_config();
        assert_eq!(config.generations, GenerationFilter::All);
        assert_eq!(config.credentials.basic_auth(), None);

        let scan = cli.scan_options();
        assert_eq!(scan.timeout, Duration::from_secs(60));
        assert_eq!(scan.service_type, "_http._tcp.local.");
        assert_eq!(scan.name_prefix, "shelly");
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "shelly-updater",
            "--username",
            "ops",
            "--password",
            "hunter2",
            "--stage",
            "beta",
            "--gen",
            "2",
        ])
        .unwrap();

        let config = cli.updater_config();
        assert_eq!(config.stage, Stage::Beta);
        assert_eq!(config.generations, GenerationFilter::Only(Generation::Gen2));
        assert_eq!(config.credentials.basic_auth(), Some(("ops", "hunter2")));
    }

    #[test]
    fn test_invalid_stage_is_usage_error() {
        let err = Cli::try_parse_from(["shelly-updater", "--stage", "nightly"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_generation_is_usage_error() {
        let err = Cli::try_parse_from(["shelly-updater", "--gen", "3"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
