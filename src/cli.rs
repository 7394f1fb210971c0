//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};
use std::path::PathBuf;

/// presetmerge - merge loose preset files
///
/// Reshapes every `*.json` file in a directory into a preset and merges them
/// into a single document keyed by each file's `Root` field.
#[derive(Parser, Debug)]
#[command(
    name = "presetmerge",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Merge loose preset JSON files into generated_presets.json",
    long_about = "Scans a directory for *.json files, reshapes each one into a preset \
                  (_changeWeaponName, _id, _items, _name, _parent, _type) and writes them \
                  into a single JSON document keyed by each file's Root field.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  presetmerge                         \x1b[90m# Merge files in the current directory\x1b[0m\n   \
                  presetmerge -d ./presets            \x1b[90m# Merge files in ./presets\x1b[0m\n   \
                  presetmerge -o weapons.json         \x1b[90m# Write weapons.json instead\x1b[0m\n   \
                  presetmerge --dry-run -v            \x1b[90m# Show what would be merged\x1b[0m\n"
)]
pub struct Cli {
    /// Directory to scan (defaults to current directory)
    #[arg(long, short = 'd', env = "PRESETMERGE_DIR")]
    pub dir: Option<PathBuf>,

    /// Output file name inside the scanned directory [default: generated_presets.json]
    #[arg(long, short = 'o', value_name = "NAME", env = "PRESETMERGE_OUTPUT")]
    pub output: Option<String>,

    /// Process every file but do not write the output
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress everything except errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}
