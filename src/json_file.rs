// JSON task file operations

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::models::Task;

/// Read the task list at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_tasks(path: &Path) -> Result<Option<Vec<Task>>> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = ?path, "Task file does not exist yet");
            return Ok(None);
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let tasks: Vec<Task> = serde_json::from_slice(&content).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    info!(file = ?path, count = tasks.len(), "Loaded tasks");
    Ok(Some(tasks))
}

/// Write the full task list to `path`, replacing whatever was there.
///
/// With `atomic` set the list goes to a temporary file in the same directory
/// which is then renamed over `path`, so a failed write leaves the old file
/// intact. The replacement keeps the permissions of the file it replaces, and
/// a symlinked `path` has its target replaced rather than the link.
pub fn write_tasks(path: &Path, tasks: &[Task], atomic: bool) -> Result<()> {
    let json = to_pretty_json(tasks)?;

    if atomic {
        // Missing files have nothing to resolve
        let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        if let Ok(metadata) = fs::metadata(&target) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| StoreError::io(tmp.path(), e))?;
        }
        tmp.write_all(&json).map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&target).map_err(|e| StoreError::io(&target, e.error))?;
    } else {
        fs::write(path, &json).map_err(|e| StoreError::io(path, e))?;
    }

    debug!(file = ?path, count = tasks.len(), atomic, "Saved tasks");
    Ok(())
}

// Four-space indent, matching files written by earlier versions of the tool
fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
