use clap::{ArgAction, Parser, Subcommand};

use crate::indicator::IndicatorKind;

#[derive(Parser)]
#[command(
    name = "zoneclock",
    version,
    about = "Show the time in several zones and blink an LED",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Milliseconds between frames (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// How to show the LED state (overrides config)
    #[arg(long, value_enum)]
    pub indicator: Option<IndicatorKind>,

    /// BCM pin number for the GPIO indicator (overrides config)
    #[arg(long)]
    pub pin: Option<u8>,

    /// Stop after this many frames
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Don't clear the screen between frames
    #[arg(long = "no-clear")]
    pub no_clear: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert epoch seconds to a date and time
    Convert {
        /// Seconds since 1970-01-01T00:00:00Z
        #[arg(allow_negative_numbers = true)]
        epoch: i64,
        /// Fixed zone offset in seconds, e.g. 19800 for +05:30
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
