//! Scan, transform and merge pipeline
//!
//! A run moves through three phases and never goes back:
//!
//! 1. **Scanning**: find `*.json` candidates in the target directory
//! 2. **Processing**: parse each candidate, extract its `Root` key and insert
//!    the resulting preset; a bad file is recorded and skipped
//! 3. **Writing**: serialize the merged document, unless it is empty or the
//!    run is a dry run
//!
//! Only a failure in phase 1 or 3 ends the run with an error.

use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::MergeConfig;
use crate::discovery::{DiscoveredFile, discover};
use crate::error::{PresetError, Result, invalid_json, processing_failed};
use crate::preset::{Preset, RootError, json_type_name, root_key};
use crate::ui::MergeReporter;
use crate::writer::write_json_atomic;

/// Root key to preset, in insertion order
pub type MergedDocument = IndexMap<String, Preset>;

/// A file that contributed nothing to the output
#[derive(Debug)]
pub struct SkippedFile {
    pub file: String,
    pub error: PresetError,
}

/// A root key that was seen more than once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRoot {
    pub root: String,
    /// The file whose preset replaced the earlier one
    pub file: String,
}

/// What happened during a run
#[derive(Debug, Default)]
pub struct MergeSummary {
    /// Every matching file name, output file included
    pub found: Vec<String>,
    /// Files processed, in order
    pub processed: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    pub duplicates: Vec<DuplicateRoot>,
    /// Number of presets in the merged document
    pub merged: usize,
    pub output: PathBuf,
}

/// Result of a completed run
#[derive(Debug)]
pub struct MergeOutcome {
    /// Whether the output file was created or replaced
    pub written: bool,
    pub summary: MergeSummary,
    pub document: MergedDocument,
}

/// Parse one file and turn it into a `(root, preset)` pair.
pub fn process_file(path: &Path, name: &str) -> Result<(String, Preset)> {
    let bytes = std::fs::read(path).map_err(|e| processing_failed(name, e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| processing_failed(name, e.to_string()))?;
    let value: Value = serde_json::from_str(&text).map_err(|e| invalid_json(name, e.to_string()))?;

    let source = match value {
        Value::Object(map) => map,
        other => {
            return Err(processing_failed(
                name,
                format!(
                    "top-level value is {}, expected an object",
                    article(json_type_name(&other))
                ),
            ));
        }
    };

    let root = root_key(&source).map_err(|e| match e {
        RootError::Missing => PresetError::MissingRoot {
            path: name.to_string(),
        },
        RootError::Unusable(kind) => {
            processing_failed(name, format!("'Root' is {}, which cannot be a key", article(kind)))
        }
    })?;

    Ok((root, Preset::from_source(&source)))
}

fn article(kind: &str) -> String {
    if kind.starts_with(['a', 'e', 'i', 'o', 'u']) {
        format!("an {kind}")
    } else {
        format!("a {kind}")
    }
}

/// Insert `preset` under `root`, returning whether an earlier entry was replaced.
///
/// A replaced key keeps its original position in the document.
pub fn insert_preset(document: &mut MergedDocument, root: String, preset: Preset) -> bool {
    document.insert(root, preset).is_some()
}

/// Run the whole pipeline for `config`.
pub fn run(config: &MergeConfig, reporter: &mut dyn MergeReporter) -> Result<MergeOutcome> {
    let output = config.output_path();

    // Scanning
    let discovery = discover(&config.directory, &config.output_name)?;
    reporter.found_files(&discovery.found);
    if discovery.output_excluded {
        reporter.output_excluded(&config.output_name);
    }

    let mut summary = MergeSummary {
        found: discovery.found,
        output: output.clone(),
        ..MergeSummary::default()
    };
    let mut document = MergedDocument::new();

    // Processing
    for DiscoveredFile { name, path } in discovery.candidates {
        reporter.processing(&name);
        summary.processed.push(name.clone());

        match process_file(&path, &name) {
            Ok((root, preset)) => {
                if insert_preset(&mut document, root.clone(), preset) {
                    reporter.duplicate(&name, &root);
                    summary.duplicates.push(DuplicateRoot { root, file: name });
                } else {
                    reporter.added(&name, &root);
                }
            }
            Err(error) if error.is_per_file() => {
                reporter.skipped(&name, &error);
                summary.skipped.push(SkippedFile { file: name, error });
            }
            Err(error) => return Err(error),
        }
    }
    summary.merged = document.len();

    // Writing
    if document.is_empty() {
        reporter.nothing_to_write();
        return Ok(MergeOutcome {
            written: false,
            summary,
            document,
        });
    }

    if config.dry_run {
        reporter.dry_run(document.len(), &output);
        return Ok(MergeOutcome {
            written: false,
            summary,
            document,
        });
    }

    write_json_atomic(&document, &output)?;
    reporter.written(document.len(), &output);

    Ok(MergeOutcome {
        written: true,
        summary,
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::SilentReporter;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    /// Reporter that records events for assertions
    #[derive(Default)]
    struct RecordingReporter {
        events: Vec<String>,
    }

    impl MergeReporter for RecordingReporter {
        fn found_files(&mut self, files: &[String]) {
            self.events.push(format!("found {}", files.join(",")));
        }
        fn output_excluded(&mut self, name: &str) {
            self.events.push(format!("excluded {name}"));
        }
        fn processing(&mut self, file: &str) {
            self.events.push(format!("processing {file}"));
        }
        fn skipped(&mut self, file: &str, _error: &PresetError) {
            self.events.push(format!("skipped {file}"));
        }
        fn added(&mut self, file: &str, root: &str) {
            self.events.push(format!("added {file} {root}"));
        }
        fn duplicate(&mut self, file: &str, root: &str) {
            self.events.push(format!("duplicate {file} {root}"));
        }
        fn nothing_to_write(&mut self) {
            self.events.push("nothing".to_string());
        }
        fn written(&mut self, count: usize, _output: &Path) {
            self.events.push(format!("written {count}"));
        }
        fn dry_run(&mut self, count: usize, _output: &Path) {
            self.events.push(format!("dry-run {count}"));
        }
        fn finished(&mut self, outcome: &MergeOutcome) {
            self.events.push(format!("finished {}", outcome.written));
        }
    }

    fn workspace(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp.path().join(name), content).unwrap();
        }
        temp
    }

    fn read_output(temp: &TempDir) -> Value {
        let text = fs::read_to_string(temp.path().join("generated_presets.json")).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_round_trip_record() {
        let temp = workspace(&[(
            "r1.json",
            r#"{"Root":"r1","Id":"i1","Name":"n1","Parent":"p1","Items":[1,2]}"#,
        )]);

        let outcome = run(&MergeConfig::new(temp.path()), &mut SilentReporter).unwrap();
        assert!(outcome.written);
        assert_eq!(
            read_output(&temp),
            json!({
                "r1": {
                    "_changeWeaponName": false,
                    "_id": "i1",
                    "_items": [1, 2],
                    "_name": "n1",
                    "_parent": "p1",
                    "_type": "Preset"
                }
            })
        );
    }

    #[test]
    fn test_duplicate_root_last_file_wins() {
        let temp = workspace(&[
            ("a.json", r#"{"Root":"X","Id":1}"#),
            ("b.json", r#"{"Root":"X","Id":2}"#),
        ]);
        let mut reporter = RecordingReporter::default();

        let outcome = run(&MergeConfig::new(temp.path()), &mut reporter).unwrap();
        assert_eq!(read_output(&temp)["X"]["_id"], json!(2));
        assert_eq!(
            outcome.summary.duplicates,
            vec![DuplicateRoot {
                root: "X".to_string(),
                file: "b.json".to_string()
            }]
        );
        assert_eq!(outcome.summary.merged, 1);
        assert!(reporter.events.contains(&"duplicate b.json X".to_string()));
    }

    #[test]
    fn test_duplicate_keeps_first_position() {
        let temp = workspace(&[
            ("a.json", r#"{"Root":"first","Id":1}"#),
            ("b.json", r#"{"Root":"second"}"#),
            ("c.json", r#"{"Root":"first","Id":3}"#),
        ]);

        let outcome = run(&MergeConfig::new(temp.path()), &mut SilentReporter).unwrap();
        let keys: Vec<&str> = outcome.document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(outcome.document["first"].id, json!(3));

        let text = fs::read_to_string(temp.path().join("generated_presets.json")).unwrap();
        assert!(text.find("\"first\"").unwrap() < text.find("\"second\"").unwrap());
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let temp = workspace(&[
            ("bad.json", "{ not json"),
            ("good.json", r#"{"Root":"ok"}"#),
        ]);

        let outcome = run(&MergeConfig::new(temp.path()), &mut SilentReporter).unwrap();
        assert!(outcome.written);
        assert_eq!(outcome.summary.skipped.len(), 1);
        assert_eq!(outcome.summary.skipped[0].file, "bad.json");
        assert!(matches!(
            outcome.summary.skipped[0].error,
            PresetError::InvalidJson { .. }
        ));

        let output = read_output(&temp);
        let keys: Vec<&String> = output.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ok"]);
    }

    #[test]
    fn test_missing_root_adds_nothing() {
        let temp = workspace(&[
            ("empty.json", r#"{"Root":"","Id":"x"}"#),
            ("none.json", r#"{"Id":"y"}"#),
            ("zero.json", r#"{"Root":0}"#),
            ("valid.json", r#"{"Root":"v"}"#),
        ]);

        let outcome = run(&MergeConfig::new(temp.path()), &mut SilentReporter).unwrap();
        assert_eq!(outcome.summary.merged, 1);
        assert_eq!(outcome.summary.skipped.len(), 3);
        assert!(
            outcome
                .summary
                .skipped
                .iter()
                .all(|s| matches!(s.error, PresetError::MissingRoot { .. }))
        );
    }

    #[test]
    fn test_non_object_root_is_processing_error() {
        let temp = workspace(&[("list.json", "[1, 2, 3]"), ("ok.json", r#"{"Root":"a"}"#)]);

        let outcome = run(&MergeConfig::new(temp.path()), &mut SilentReporter).unwrap();
        match &outcome.summary.skipped[0].error {
            PresetError::ProcessingFailed { reason, .. } => {
                assert!(reason.contains("an array"), "got: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(outcome.summary.merged, 1);
    }

    #[test]
    fn test_non_utf8_file_is_processing_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("latin1.json"), b"{\"Root\":\"caf\xe9\"}").unwrap();

        let outcome = run(&MergeConfig::new(temp.path()), &mut SilentReporter).unwrap();
        assert!(!outcome.written);
        assert!(matches!(
            outcome.summary.skipped[0].error,
            PresetError::ProcessingFailed { .. }
        ));
    }

    #[test]
    fn test_empty_directory_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut reporter = RecordingReporter::default();

        let outcome = run(&MergeConfig::new(temp.path()), &mut reporter).unwrap();
        assert!(!outcome.written);
        assert!(!temp.path().join("generated_presets.json").exists());
        assert_eq!(reporter.events, vec!["found ", "nothing"]);
    }

    #[test]
    fn test_only_invalid_files_keep_existing_output() {
        let temp = workspace(&[
            ("generated_presets.json", r#"{"old": {}}"#),
            ("bad.json", "nope"),
        ]);

        let outcome = run(&MergeConfig::new(temp.path()), &mut SilentReporter).unwrap();
        assert!(!outcome.written);
        assert_eq!(
            fs::read_to_string(temp.path().join("generated_presets.json")).unwrap(),
            r#"{"old": {}}"#
        );
    }

    #[test]
    fn test_output_file_is_never_an_input() {
        let temp = workspace(&[
            ("generated_presets.json", r#"{"Root":"from-output"}"#),
            ("a.json", r#"{"Root":"a"}"#),
        ]);
        let mut reporter = RecordingReporter::default();

        let outcome = run(&MergeConfig::new(temp.path()), &mut reporter).unwrap();
        assert_eq!(outcome.summary.processed, vec!["a.json".to_string()]);
        assert!(!outcome.document.contains_key("from-output"));
        assert!(
            reporter
                .events
                .contains(&"excluded generated_presets.json".to_string())
        );
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let temp = workspace(&[("a.json", r#"{"Root":"a"}"#)]);
        let mut config = MergeConfig::new(temp.path());
        config.dry_run = true;
        let mut reporter = RecordingReporter::default();

        let outcome = run(&config, &mut reporter).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.summary.merged, 1);
        assert!(!temp.path().join("generated_presets.json").exists());
        assert_eq!(reporter.events.last().unwrap(), "dry-run 1");
    }

    #[test]
    fn test_custom_output_name() {
        let temp = workspace(&[("a.json", r#"{"Root":"a"}"#)]);
        let mut config = MergeConfig::new(temp.path());
        config.output_name = "weapons.json".to_string();

        let outcome = run(&config, &mut SilentReporter).unwrap();
        assert!(outcome.written);
        assert!(temp.path().join("weapons.json").exists());
        assert_eq!(outcome.summary.output, temp.path().join("weapons.json"));
    }

    #[test]
    fn test_event_order() {
        let temp = workspace(&[
            ("a.json", r#"{"Root":"k"}"#),
            ("b.json", "{}"),
        ]);
        let mut reporter = RecordingReporter::default();

        run(&MergeConfig::new(temp.path()), &mut reporter).unwrap();
        assert_eq!(
            reporter.events,
            vec![
                "found a.json,b.json",
                "processing a.json",
                "added a.json k",
                "processing b.json",
                "skipped b.json",
                "written 1",
            ]
        );
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = run(
            &MergeConfig::new(temp.path().join("absent")),
            &mut SilentReporter,
        );
        assert!(matches!(result, Err(PresetError::DirectoryReadFailed { .. })));
    }
}
