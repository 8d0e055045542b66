//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use super::{tally, OutputFormatter};
use shelly_updater_core::update::{DeviceReport, UpdateOutcome};

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn outcome_color(outcome: &UpdateOutcome) -> Color {
        match outcome {
            UpdateOutcome::Updated { .. } => Color::Green,
            UpdateOutcome::UpToDate { .. } => Color::Cyan,
            UpdateOutcome::Skipped => Color::Grey,
            UpdateOutcome::Failed { .. } => Color::Red,
        }
    }

    fn details(outcome: &UpdateOutcome) -> String {
        match outcome {
            UpdateOutcome::Updated { version } => version.clone(),
            UpdateOutcome::UpToDate { version } => version.clone().unwrap_or_default(),
            UpdateOutcome::Skipped => "excluded by --gen".to_string(),
            UpdateOutcome::Failed { reason } => reason.clone(),
        }
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_reports(&self, reports: &[DeviceReport]) -> String {
        if reports.is_empty() {
            return "No Shelly devices found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Device", "Address", "Gen", "Result", "Details"]);

        for report in reports {
            table.add_row(vec![
                Cell::new(&report.name),
                Cell::new(&report.address),
                Cell::new(report.generation.as_str()),
                Cell::new(report.outcome.label()).fg(Self::outcome_color(&report.outcome)),
                Cell::new(Self::details(&report.outcome)),
            ]);
        }

        let (updated, up_to_date, skipped, failed) = tally(reports);
        let failed = if failed > 0 {
            format!("{} failed", failed).red()
        } else {
            format!("{} failed", failed).normal()
        };

        format!(
            "{}\n\n{} updated, {} up to date, {} skipped, {}",
            table,
            updated.to_string().green(),
            up_to_date,
            skipped,
            failed
        )
    }
}
