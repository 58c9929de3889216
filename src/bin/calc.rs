//! calc - decimal calculator with an interactive command shell
//!
//! `calc` or `calc interactive` starts the shell; `calc <a> <b> <operation>`
//! prints a single result and exits.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use calculator::cli::{one_shot, Mode, USAGE};
use calculator::{logging, AppConfig};

/// Decimal calculator with a recorded, analysable history.
#[derive(Parser, Debug)]
#[command(name = "calc")]
#[command(version = calculator::VERSION)]
#[command(about = "Decimal calculator with a recorded, analysable history")]
#[command(after_help = "EXAMPLES:
  # Start the interactive shell
  calc

  # One-shot calculation
  calc 10 4 divide
")]
struct Cli {
    /// Nothing, `interactive`, or `<number1> <number2> <operation>`
    #[arg(value_name = "ARGS", allow_negative_numbers = true, num_args = 0..)]
    args: Vec<String>,
}

fn run() -> anyhow::Result<i32> {
    // Fix broken pipe panic when piping to head/tail/etc.
    // Reset SIGPIPE to default behavior (terminate quietly)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging).context("Failed to initialise logging")?;
    info!(args = ?cli.args, "application started");

    match Mode::from_args(&cli.args) {
        Some(Mode::Interactive) => {
            calculator::run_interactive(config)?;
            Ok(0)
        }
        Some(Mode::OneShot { a, b, operation }) => {
            println!("{}", one_shot(&a, &b, &operation));
            Ok(0)
        }
        None => {
            error!(args = ?cli.args, "invalid command-line arguments");
            println!("{}", USAGE);
            Ok(1)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let code = run()?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
