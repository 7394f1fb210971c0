//! Output writing for the merged document
//!
//! The document is serialized with 4-space indentation and written to a
//! hidden `.<name>.tmp` sibling, which is then renamed over the output path.
//! A failed write removes the temporary file and leaves any previous output
//! untouched. A new output gets the process umask like any other created
//! file; a replaced output keeps its permissions.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Result, write_failed};

const INDENT: &[u8] = b"    ";

/// Serialize `value` as pretty JSON with 4-space indentation.
pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Temporary path next to `target`; hidden so it is never picked up as an input
fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map_or_else(|| "output".into(), |n| n.to_string_lossy());
    target.with_file_name(format!(".{name}.tmp"))
}

/// Atomically write `value` to `target` as pretty JSON.
pub fn write_json_atomic<T: Serialize>(value: &T, target: &Path) -> Result<()> {
    let fail = |e: &dyn std::fmt::Display| write_failed(target.display().to_string(), e.to_string());

    let bytes = to_pretty_json(value).map_err(|e| fail(&e))?;
    let tmp_path = temp_path(target);

    let written = write_and_replace(&bytes, &tmp_path, target);
    if written.is_err() {
        // Best effort; the temp file may never have been created
        let _ = fs::remove_file(&tmp_path);
    }
    written.map_err(|e| fail(&e))
}

fn write_and_replace(bytes: &[u8], tmp_path: &Path, target: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    if let Ok(existing) = fs::metadata(target) {
        if existing.is_file() {
            fs::set_permissions(tmp_path, existing.permissions())?;
        }
    }

    fs::rename(tmp_path, target)
}
