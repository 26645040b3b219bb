//! # starmart binary entry point
//!
//! Parses the command line, initializes logging (console plus a rolling
//! file under the warehouse directory for build runs), then executes the
//! chosen command on a Tokio runtime, since publishing to the queryable
//! store is async.

#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    starmart::logging::init(cli.command.log_dir().as_deref())?;

    tokio::runtime::Runtime::new()?.block_on(cli::run_command(cli.command))?;
    Ok(())
}
