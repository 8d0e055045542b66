//! Shelly HTTP API: endpoint builders, response shapes and generation detection.

pub mod endpoints;
pub mod response;

use std::fmt;

use serde::Serialize;

pub use endpoints::Endpoints;
pub use response::{CheckForUpdateResponse, UpdateCheckResponse, UpdateStatus, VersionInfo};

/// TXT record advertised by second-generation devices
pub const GEN2_TXT_MARKER: &str = "gen=2";

/// Device API generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    Gen1,
    Gen2,
}

impl Generation {
    /// Gen 2 devices advertise `gen=2`; everything else speaks the gen 1 API.
    pub fn from_txt_records<S: AsRef<str>>(records: &[S]) -> Self {
        if records.iter().any(|r| r.as_ref() == GEN2_TXT_MARKER) {
            Generation::Gen2
        } else {
            Generation::Gen1
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::Gen1 => "gen1",
            Generation::Gen2 => "gen2",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
