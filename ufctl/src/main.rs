use std::process;

use anyhow::Result;
use rusb_impl::BootstrapError;

mod cli;
mod rusb_impl;

fn main() -> Result<()> {
    let Err(err) = cli::execute() else {
        return Ok(());
    };

    // Failing to bring up USB access exits with the libusb result code.
    if let Some(bootstrap) = err.downcast_ref::<BootstrapError>() {
        eprintln!("Error: {err:#}");
        process::exit(bootstrap.code());
    }

    Err(err)
}
