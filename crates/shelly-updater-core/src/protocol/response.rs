//! Response shapes returned by the device endpoints.
//!
//! Devices omit fields freely (a gen 2 device with nothing to offer answers
//! `{}`), so every field falls back to its default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Stage;
use crate::error::DeviceError;

/// Decode a JSON body fetched from `url`.
pub fn parse_json_response<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, DeviceError> {
    serde_json::from_str(body).map_err(|e| DeviceError::InvalidResponse {
        url: url.to_string(),
        message: format!("Failed to parse JSON: {}", e),
    })
}

/// Gen 1 `/ota` status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateStatus {
    pub status: String,
    pub has_update: bool,
    pub new_version: String,
    pub old_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_version: Option<String>,
}

impl UpdateStatus {
    pub fn is_updating(&self) -> bool {
        self.status == "updating"
    }

    /// Whether the device has something newer on `stage`.
    ///
    /// Beta is available when the running version differs from the advertised
    /// beta version; a missing beta version reads as empty.
    pub fn update_available(&self, stage: Stage) -> bool {
        match stage {
            Stage::Stable => self.has_update,
            Stage::Beta => self.old_version != self.beta_version.as_deref().unwrap_or_default(),
        }
    }

    /// Version the device would move to on `stage`.
    pub fn target_version(&self, stage: Stage) -> &str {
        match stage {
            Stage::Stable => &self.new_version,
            Stage::Beta => self.beta_version.as_deref().unwrap_or_default(),
        }
    }
}

/// Gen 1 `/ota/check` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCheckResponse {
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    pub version: String,
    pub build_id: String,
}

/// Gen 2 `Shelly.CheckForUpdate` result, one entry per channel with an offer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckForUpdateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stable: Option<VersionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<VersionInfo>,
}

impl CheckForUpdateResponse {
    /// Version offered on `stage`, `None` when the channel has nothing newer.
    pub fn offered_version(&self, stage: Stage) -> Option<&str> {
        let info = match stage {
            Stage::Stable => self.stable.as_ref(),
            Stage::Beta => self.beta.as_ref(),
        };
        info.map(|i| i.version.as_str()).filter(|v| !v.is_empty())
    }
}
