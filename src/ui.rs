//! Console reporting for merge runs
//!
//! All progress and diagnostic output goes through the [`MergeReporter`]
//! trait, so the pipeline itself never prints. The binary picks an
//! implementation based on `--quiet` and `--verbose`.

use console::Style;
use std::path::Path;

use crate::error::PresetError;
use crate::merger::MergeOutcome;

/// Receives events from a merge run
pub trait MergeReporter {
    /// All matching file names, output file included
    fn found_files(&mut self, files: &[String]);

    /// The output file was seen among the inputs and left out
    fn output_excluded(&mut self, name: &str);

    /// About to process `file`
    fn processing(&mut self, file: &str);

    /// `file` contributed nothing because of `error`
    fn skipped(&mut self, file: &str, error: &PresetError);

    /// `file` produced a preset under `root`
    fn added(&mut self, file: &str, root: &str);

    /// `file` overwrote an earlier preset under `root`
    fn duplicate(&mut self, file: &str, root: &str);

    /// Nothing valid was found; no output will be written
    fn nothing_to_write(&mut self);

    /// `count` presets were written to `output`
    fn written(&mut self, count: usize, output: &Path);

    /// `count` presets would have been written to `output`
    fn dry_run(&mut self, count: usize, output: &Path);

    /// The run completed
    fn finished(&mut self, outcome: &MergeOutcome);
}

/// Reporter printing to stdout with `console` styling
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

/// Render the skip line for a per-file error
pub fn skip_message(file: &str, error: &PresetError) -> String {
    match error {
        PresetError::InvalidJson { .. } => {
            format!("Skipping {file}: Not a valid JSON file.")
        }
        PresetError::MissingRoot { .. } => {
            format!("Skipping {file}: 'Root' key is missing or empty.")
        }
        PresetError::ProcessingFailed { reason, .. } => {
            format!("An error occurred while processing {file}: {reason}")
        }
        other => format!("An error occurred while processing {file}: {other}"),
    }
}

impl MergeReporter for ConsoleReporter {
    fn found_files(&mut self, files: &[String]) {
        println!("Found files: [{}]", files.join(", "));
    }

    fn output_excluded(&mut self, name: &str) {
        if self.verbose {
            println!(
                "{}",
                Style::new()
                    .dim()
                    .apply_to(format!("  ...Ignoring {name}: output file"))
            );
        }
    }

    fn processing(&mut self, file: &str) {
        println!("Processing {file}...");
    }

    fn skipped(&mut self, file: &str, error: &PresetError) {
        let line = format!("  ...{}", skip_message(file, error));
        if matches!(error, PresetError::ProcessingFailed { .. }) {
            println!("{}", Style::new().red().apply_to(line));
        } else {
            println!("{}", Style::new().dim().apply_to(line));
        }
        if self.verbose {
            if let PresetError::InvalidJson { reason, .. } = error {
                println!("{}", Style::new().dim().apply_to(format!("     {reason}")));
            }
        }
    }

    fn added(&mut self, _file: &str, root: &str) {
        if self.verbose {
            println!(
                "{}",
                Style::new().dim().apply_to(format!("  ...Added preset '{root}'"))
            );
        }
    }

    fn duplicate(&mut self, file: &str, root: &str) {
        println!(
            "{}",
            Style::new().yellow().apply_to(format!(
                "  ...Warning: Duplicate Root ID '{root}' found in {file}. Overwriting previous entry."
            ))
        );
    }

    fn nothing_to_write(&mut self) {
        println!("No valid preset files found. Output file will not be created.");
    }

    fn written(&mut self, count: usize, output: &Path) {
        println!(
            "\n{}",
            Style::new().green().bold().apply_to(format!(
                "Successfully merged {count} presets into {}",
                output.display()
            ))
        );
    }

    fn dry_run(&mut self, count: usize, output: &Path) {
        println!(
            "\n{} Would merge {count} presets into {}",
            Style::new().cyan().bold().apply_to("[DRY RUN]"),
            output.display()
        );
    }

    fn finished(&mut self, outcome: &MergeOutcome) {
        if !self.verbose {
            return;
        }
        let summary = &outcome.summary;
        let bold = Style::new().bold();

        println!("\n{}", bold.apply_to("Summary:"));
        println!("  Found: {}", summary.found.len());
        println!("  Processed: {}", summary.processed.len());
        println!("  Merged: {}", summary.merged);
        for root in outcome.document.keys() {
            println!("    {root}");
        }
        println!("  Skipped: {}", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("    {}: {}", skipped.file, skipped.error);
        }
        println!("  Duplicates: {}", summary.duplicates.len());
        for duplicate in &summary.duplicates {
            println!("    '{}' replaced by {}", duplicate.root, duplicate.file);
        }
        println!(
            "  Output: {} ({})",
            summary.output.display(),
            if outcome.written { "written" } else { "not written" }
        );
    }
}

/// Silent reporter for `--quiet` and tests
///
/// No-op implementation that does not display anything.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl MergeReporter for SilentReporter {
    fn found_files(&mut self, _files: &[String]) {}

    fn output_excluded(&mut self, _name: &str) {}

    fn processing(&mut self, _file: &str) {}

    fn skipped(&mut self, _file: &str, _error: &PresetError) {}

    fn added(&mut self, _file: &str, _root: &str) {}

    fn duplicate(&mut self, _file: &str, _root: &str) {}

    fn nothing_to_write(&mut self) {}

    fn written(&mut self, _count: usize, _output: &Path) {}

    fn dry_run(&mut self, _count: usize, _output: &Path) {}

    fn finished(&mut self, _outcome: &MergeOutcome) {}
}
