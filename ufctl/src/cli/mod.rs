mod probe;
mod set;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;
use probe::ProbeCommand;
use set::SetCommand;

/// Adjust the brightness of LG UltraFine monitors.
///
/// Monitors are addressed by their index among all attached UltraFine
/// monitors, starting at 0, or all at once using "all".
#[derive(Parser)]
#[command(
    version,
    about,
    long_about = None,
    subcommand_negates_reqs = true
)]
struct Cli {
    #[command(flatten)]
    color: colorchoice_clap::Color,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    set: SetCommand,

    /// Output plain JSON without color
    #[arg(short, long, global = true)]
    json: bool,

    /// Log more details, may be repeated
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    Probe(ProbeCommand),
}

pub fn execute() -> Result<()> {
    let cli = Cli::parse();

    cli.color.write_global();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Commands::Probe(cmd)) => cmd.execute(&cli),
        None => cli.set.execute(&cli),
    }
}

/// Installs the logger. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();
}
