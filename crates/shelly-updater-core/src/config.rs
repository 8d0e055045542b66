//! Immutable run configuration shared by every device task.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::Generation;

/// Default per-request HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Firmware release channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Stable,
    Beta,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Stable => "stable",
            Stage::Beta => "beta",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(Stage::Stable),
            "beta" => Ok(Stage::Beta),
            other => Err(format!("unknown stage '{}', expected stable or beta", other)),
        }
    }
}

/// Which device generations a run is allowed to touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationFilter {
    #[default]
    All,
    Only(Generation),
}

impl GenerationFilter {
    /// Map the numeric `--gen` value (0 = all) to a filter.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(GenerationFilter::All),
            1 => Some(GenerationFilter::Only(Generation::Gen1)),
            2 => Some(GenerationFilter::Only(Generation::Gen2)),
            _ => None,
        }
    }

    pub fn allows(&self, generation: Generation) -> bool {
        match self {
            GenerationFilter::All => true,
            GenerationFilter::Only(g) => *g == generation,
        }
    }
}

/// Basic-auth credentials. Only sent when a password is configured.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `(username, password)` when basic auth should be applied.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        if self.password.is_empty() {
            None
        } else {
            Some((self.username.as_str(), self.password.as_str()))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"*******")
            .finish()
    }
}

/// Waits and retry caps of the update sequences.
#[derive(Debug, Clone)]
pub struct UpdatePolicy {
    /// Wait between triggering a gen 1 update check and reading its result
    pub check_delay: Duration,
    /// Wait between two status polls
    pub poll_interval: Duration,
    /// Status polls allowed while a gen 1 device reports "updating"
    pub gen1_max_polls: u32,
    /// Completion checks allowed after a gen 2 update was started
    pub gen2_max_attempts: u32,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            check_delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(5),
            gen1_max_polls: 60,
            gen2_max_attempts: 12,
        }
    }
}

/// Everything a device task needs to know about the run.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    pub credentials: Credentials,
    pub stage: Stage,
    pub generations: GenerationFilter,
    pub request_timeout: Duration,
    pub policy: UpdatePolicy,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::new("admin", ""),
            stage: Stage::Stable,
            generations: GenerationFilter::All,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            policy: UpdatePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parsing() {
        assert_eq!("stable".parse::<Stage>(), Ok(Stage::Stable));
        assert_eq!("beta".parse::<Stage>(), Ok(Stage::Beta));
        assert!("nightly".parse::<Stage>().is_err());
        assert_eq!(Stage::Beta.to_string(), "beta");
    }

    #[test]
    fn test_generation_filter() {
        assert_eq!(GenerationFilter::from_number(0), Some(GenerationFilter::All));
        assert_eq!(GenerationFilter::from_number(3), None);

        let only_gen2 = GenerationFilter::from_number(2).unwrap();
        assert!(only_gen2.allows(Generation::Gen2));
        assert!(!only_gen2.allows(Generation::Gen1));
        assert!(GenerationFilter::All.allows(Generation::Gen1));
    }

    #[test]
    fn test_basic_auth_requires_password() {
        assert_eq!(Credentials::new("admin", "").basic_auth(), None);
        assert_eq!(
            Credentials::new("admin", "secret").basic_auth(),
            Some(("admin", "secret"))
        );
    }

    #[test]
    fn test_credentials_debug_masks_password() {
        let debug = format!("{:?}", Credentials::new("admin", "secret"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_default_policy() {
        let policy = UpdatePolicy::default();
        assert_eq!(policy.poll_interval, Duration::from_secs(5));
        assert_eq!(policy.gen2_max_attempts, 12);
    }
}
