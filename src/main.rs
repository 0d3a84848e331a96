mod calendar;
mod cli;
mod clock_config;
mod config;
mod indicator;
mod ticker;
mod zones;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Command};
use indicator::Blinker;
use ticker::TickOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(cmd) => run_subcommand(cmd),
        None => run_clock(&cli),
    }
}

/// Logs go to stderr so they never land inside the clock frame on stdout.
/// `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

fn run_clock(cli: &Cli) -> Result<()> {
    let cfg = clock_config::load_config();

    let interval_ms = cli.interval_ms.unwrap_or(cfg.interval_ms);
    let kind = cli.indicator.unwrap_or(cfg.indicator);
    let pin = cli.pin.unwrap_or(cfg.gpio_pin);
    let opts = TickOptions {
        interval: Duration::from_millis(interval_ms),
        clear_screen: cfg.clear_screen && !cli.no_clear,
        ticks: cli.ticks,
        zones: cfg.zones,
    };
    log::info!(
        "ticking every {interval_ms}ms across {} zone(s), LED via {kind:?}",
        opts.zones.len()
    );

    let mut blinker = Blinker::new(indicator::open(kind, pin));
    let mut out = io::stdout().lock();
    ticker::run(&opts, ticker::now_epoch, &mut blinker, &mut out)
}

fn run_subcommand(cmd: Command) -> Result<()> {
    match cmd {
        Command::Convert { epoch, offset } => {
            zones::write_conversion(&mut io::stdout().lock(), epoch, offset)
        }
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "zoneclock", &mut io::stdout());
            Ok(())
        }
    }
}
