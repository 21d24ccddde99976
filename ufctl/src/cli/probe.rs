use std::io::{BufWriter, Write};

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use ultrafine::{
    controller::{self, ProbeOutcome},
    protocol::{PRODUCT_ID, VENDOR_ID},
    selector::{self, DeviceSelection},
    transport::UsbTransport,
};

use super::Cli;
use crate::rusb_impl::{BootstrapError, RusbTransport};

/// Detect attached monitors and read their current brightness.
#[derive(Args)]
pub struct ProbeCommand {
    /// Index of the monitor to probe, or "all"
    #[arg(value_name = "DEVICE", default_value = "all")]
    pub device: DeviceSelection,
}

impl ProbeCommand {
    pub fn execute(&self, root: &Cli) -> Result<()> {
        let mut stdout = BufWriter::new(anstream::stdout());

        let monitors = probe_monitors(self.device)?;

        if root.json {
            writeln!(stdout, "{}", json!(monitors))?;
            stdout.flush()?;
            return Ok(());
        }

        if monitors.is_empty() {
            writeln!(stdout, "{}", "No UltraFine monitors were found.".bright_black())?;
            stdout.flush()?;
            return Ok(());
        }

        for monitor in monitors {
            writeln!(
                stdout,
                "{}: {} {} ({:#06x}:{:#06x}) {}",
                monitor.index.bright_blue(),
                if matches!(monitor.outcome, ProbeOutcome::Read(_)) {
                    "●".green().into_styled()
                } else {
                    "●".red().into_styled()
                },
                "LG UltraFine",
                VENDOR_ID.bright_black(),
                PRODUCT_ID.bright_black(),
                format!("[bus {:03} address {:03}]", monitor.bus, monitor.address).bright_black(),
            )?;

            let status = match monitor.outcome {
                ProbeOutcome::Read(percent) => {
                    format!("BRIGHTNESS: {}", format!("{percent}%").blue())
                },
                ProbeOutcome::ReadFailed => "unable to get brightness".yellow().to_string(),
                ProbeOutcome::SkippedOpenFailed => "could not be opened".red().to_string(),
                ProbeOutcome::SkippedClaimFailed => {
                    "HID interface could not be claimed".red().to_string()
                },
            };
            writeln!(stdout, " ╰─ {status}")?;
        }

        stdout.flush()?;

        Ok(())
    }
}

fn probe_monitors(selection: DeviceSelection) -> Result<Vec<ProbedMonitor>> {
    let transport = RusbTransport::new()?;
    let devices = transport.enumerate().map_err(BootstrapError::DeviceList)?;

    Ok(selector::select_indexed(devices, selection)
        .into_iter()
        .map(|(index, device)| ProbedMonitor {
            index,
            bus: device.bus_number(),
            address: device.address(),
            outcome: controller::probe(&transport, &device),
        })
        .collect())
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
struct ProbedMonitor {
    index: usize,
    bus: u8,
    address: u8,
    outcome: ProbeOutcome,
}
