//! Candidate discovery for a preset directory
//!
//! This module handles:
//! - Listing `*.json` regular files one level deep (no recursion)
//! - Skipping hidden files, like a shell glob does
//! - Excluding the output file by exact name
//! - Sorting candidates by file name so "last file wins" is reproducible

use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{PresetError, Result};

/// Pattern input files must match
pub const INPUT_PATTERN: &str = "*.json";

/// A file selected for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// File name as reported to the user
    pub name: String,
    /// Full path used for reading
    pub path: PathBuf,
}

/// Result of scanning a directory
#[derive(Debug, Default)]
pub struct Discovery {
    /// Every matching file name, output file included
    pub found: Vec<String>,
    /// Files to process, in processing order
    pub candidates: Vec<DiscoveredFile>,
    /// Whether the output file was among the matches
    pub output_excluded: bool,
}

/// Scan `dir` for input files, leaving out `output_name`.
pub fn discover(dir: &Path, output_name: &str) -> Result<Discovery> {
    let dir_read_failed = |reason: String| PresetError::DirectoryReadFailed {
        path: dir.display().to_string(),
        reason,
    };
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(dir_read_failed("not a directory".to_string())),
        Err(e) => return Err(dir_read_failed(e.to_string())),
    }

    let glob = Glob::new(INPUT_PATTERN).map_err(|e| PresetError::IoError {
        message: format!("invalid input pattern '{INPUT_PATTERN}': {e}"),
    })?;

    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Depth 0 is the directory itself; a bad entry inside (e.g. a
            // dangling symlink) is not a regular file and is left out
            Err(e) if e.depth() == 0 => return Err(dir_read_failed(e.to_string())),
            Err(_) => continue,
        };

        if !entry.file_type().is_file() {
            continue;
        }
        // Non UTF-8 names cannot be reported or used as keys reliably
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.starts_with('.') || glob.matched(&CandidatePath::from(name)).is_none() {
            continue;
        }
        found.push(DiscoveredFile {
            name: name.to_string(),
            path: entry.path().to_path_buf(),
        });
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));

    let mut discovery = Discovery {
        found: found.iter().map(|f| f.name.clone()).collect(),
        ..Discovery::default()
    };
    for file in found {
        if file.name == output_name {
            discovery.output_excluded = true;
        } else {
            discovery.candidates.push(file);
        }
    }

    Ok(discovery)
}
