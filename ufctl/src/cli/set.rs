use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use ultrafine::{
    controller::{self, AdjustOutcome},
    selector::DeviceSelection,
};

use super::Cli;
use crate::rusb_impl::{BootstrapError, RusbTransport};

/// Set the brightness of one or all monitors.
#[derive(Args)]
pub struct SetCommand {
    /// Index of the monitor to adjust, or "all"
    #[arg(value_name = "DEVICE", required = true)]
    pub device: Option<DeviceSelection>,

    /// Brightness in percent, values outside 0-100 are clamped
    #[arg(value_name = "BRIGHTNESS", required = true, allow_negative_numbers = true)]
    pub brightness: Option<i32>,
}

impl SetCommand {
    pub fn execute(&self, root: &Cli) -> Result<()> {
        let selection = self.device.context("no monitor was selected")?;
        let brightness = self.brightness.context("no brightness was given")?;

        log::info!("setting brightness of monitor {selection} to {brightness}%");

        let transport = RusbTransport::new()?;
        let outcomes = controller::adjust_selected(&transport, selection, brightness)
            .map_err(BootstrapError::DeviceList)?;

        let mut stdout = BufWriter::new(anstream::stdout());

        if root.json {
            let adjusted: Vec<AdjustedMonitor> = outcomes
                .into_iter()
                .map(|(index, outcome)| AdjustedMonitor { index, outcome })
                .collect();
            writeln!(stdout, "{}", json!(adjusted))?;
            stdout.flush()?;
            return Ok(());
        }

        if outcomes.is_empty() {
            writeln!(
                stdout,
                "{}",
                format!("No monitor matches {selection}.").bright_black()
            )?;
        }

        for (index, outcome) in outcomes {
            match outcome {
                AdjustOutcome::Success(report) => {
                    if report.read_ok {
                        writeln!(
                            stdout,
                            "{}: Current brightness = {}",
                            index.bright_blue(),
                            format!("{}%", report.current).blue()
                        )?;
                    } else {
                        writeln!(
                            stdout,
                            "{}: {}",
                            index.bright_blue(),
                            "Unable to get brightness.".yellow()
                        )?;
                    }

                    if !report.written {
                        writeln!(
                            stdout,
                            "{}: {}",
                            index.bright_blue(),
                            "Unable to set brightness.".red()
                        )?;
                    }
                },
                AdjustOutcome::SkippedOpenFailed => writeln!(
                    stdout,
                    "{}: {}",
                    index.bright_blue(),
                    "Skipped, the monitor could not be opened.".red()
                )?,
                AdjustOutcome::SkippedClaimFailed => writeln!(
                    stdout,
                    "{}: {}",
                    index.bright_blue(),
                    "Skipped, the monitor's HID interface could not be claimed.".red()
                )?,
            }
        }

        stdout.flush()?;

        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
struct AdjustedMonitor {
    index: usize,
    outcome: AdjustOutcome,
}
