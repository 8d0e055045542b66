//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use shelly_updater_core::update::DeviceReport;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the per-device results of a run
    fn format_reports(&self, reports: &[DeviceReport]) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}

/// `(updated, up to date, skipped, failed)` counts.
pub(crate) fn tally(reports: &[DeviceReport]) -> (usize, usize, usize, usize) {
    use shelly_updater_core::update::UpdateOutcome::*;

    reports
        .iter()
        .fold((0, 0, 0, 0), |(u, c, s, f), r| match r.outcome {
            Updated { .. } => (u + 1, c, s, f),
            UpToDate { .. } => (u, c + 1, s, f),
            Skipped => (u, c, s + 1, f),
            Failed { .. } => (u, c, s, f + 1),
        })
}
