//! presetmerge - merge loose preset JSON files
//!
//! Scans a directory for `*.json` files, reshapes each into a preset and
//! writes them all into one document keyed by the files' `Root` field.

use clap::Parser;
use console::Style;
use miette::Diagnostic;

mod cli;
mod config;
mod discovery;
mod error;
mod merger;
mod preset;
mod ui;
mod writer;

use cli::Cli;
use config::MergeConfig;
use error::Result;
use ui::{ConsoleReporter, MergeReporter, SilentReporter};

fn run(cli: &Cli) -> Result<()> {
    let config = MergeConfig::from_cli(cli)?;

    let mut reporter: Box<dyn MergeReporter> = if cli.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(ConsoleReporter::new(cli.verbose))
    };

    let outcome = merger::run(&config, reporter.as_mut())?;
    reporter.finished(&outcome);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", Style::new().red().bold().apply_to("Error:"), e);
        if let Some(help) = e.help() {
            eprintln!("  {} {}", Style::new().dim().apply_to("help:"), help);
        }
        std::process::exit(1);
    }
}
