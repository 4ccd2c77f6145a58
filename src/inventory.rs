//! Workspace enumeration and input sizing.
//!
//! The workspace is a directory whose immediate child directories are the
//! units being compressed. Names starting with `.` and the fixed denylist
//! are skipped. Input sizes are measured recursively on first use and cached
//! for the rest of the run, since a size changing mid-sweep would make the
//! dictionary bound and the measured totals disagree.

use std::cell::OnceCell;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::TuneError;

/// Directory names never treated as inputs.
const DENYLIST: &[&str] = &["venv"];

/// A named, sized unit of data to compress.
#[derive(Debug)]
pub struct InputItem {
    name: OsString,
    path: PathBuf,
    size: OnceCell<u64>,
}

impl InputItem {
    /// The item's directory name, unique within the workspace.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recursive on-disk size in bytes, measured once and cached.
    pub fn size(&self) -> Result<u64, TuneError> {
        if let Some(size) = self.size.get() {
            return Ok(*size);
        }
        let measured = dir_size(&self.path)?;
        Ok(*self.size.get_or_init(|| measured))
    }
}

/// The fixed list of inputs for one driver run.
#[derive(Debug)]
pub struct WorkspaceInventory {
    items: Vec<InputItem>,
}

impl WorkspaceInventory {
    /// Enumerate the workspace's immediate child directories, excluding
    /// hidden and denylisted names. An empty workspace yields an empty
    /// inventory, not an error.
    pub fn scan(root: &Path) -> Result<Self, TuneError> {
        let mut items = Vec::new();
        let entries = fs::read_dir(root)
            .map_err(|source| TuneError::Io { source, path: root.to_path_buf() })?;
        for entry in entries {
            let entry =
                entry.map_err(|source| TuneError::Io { source, path: root.to_path_buf() })?;
            let file_type = entry
                .file_type()
                .map_err(|source| TuneError::Io { source, path: entry.path() })?;
            if !file_type.is_dir() {
                continue;
            }
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            if DENYLIST.iter().any(|denied| name == OsStr::new(denied)) {
                continue;
            }
            items.push(InputItem { path: entry.path(), name, size: OnceCell::new() });
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[InputItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The maximum recursive size among all inputs; 0 for an empty workspace.
    pub fn largest_input_size(&self) -> Result<u64, TuneError> {
        let mut largest = 0u64;
        for item in &self.items {
            largest = largest.max(item.size()?);
        }
        Ok(largest)
    }
}

fn walk_error(err: walkdir::Error, fallback: &Path) -> TuneError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fallback.to_path_buf());
    match err.into_io_error() {
        Some(source) => TuneError::Io { source, path },
        None => TuneError::Io { source: std::io::Error::other("filesystem loop detected"), path },
    }
}

fn dir_size(path: &Path) -> Result<u64, TuneError> {
    let mut total = 0u64;
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| walk_error(e, path))?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(|e| walk_error(e, path))?.len();
        }
    }
    Ok(total)
}
