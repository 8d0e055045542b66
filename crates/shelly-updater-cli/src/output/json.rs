//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::json;

use super::{tally, OutputFormatter};
use shelly_updater_core::update::DeviceReport;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_reports(&self, reports: &[DeviceReport]) -> String {
        let (updated, up_to_date, skipped, failed) = tally(reports);

        Self::to_json(&json!({
            "devices": reports,
            "summary": {
                "total": reports.len(),
                "updated": updated,
                "up_to_date": up_to_date,
                "skipped": skipped,
                "failed": failed
            }
        }))
    }
}
