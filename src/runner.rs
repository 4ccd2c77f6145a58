//! 7-Zip resolution and per-candidate archive production.
//!
//! The compressor binary is resolved exactly once at startup and handed to
//! [`ArchiveRunner`] as constructor state. The runner tracks the artifact
//! paths it creates for the current candidate and sums exactly those, rather
//! than re-globbing the workspace for `*.7z` files, so unrelated archives or
//! a failed earlier cleanup cannot leak into a candidate's total.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::TuneError;
use crate::inventory::InputItem;

/// Suffix of every artifact the runner produces.
pub const ARCHIVE_EXTENSION: &str = "7z";

/// Resolve the 7-Zip binary: an explicit override (flag or environment) if
/// given, otherwise `7zz` then `7z` on PATH, plus the standard install paths
/// on Windows. Each candidate is probed by running `<bin> i` with all output
/// discarded. Failure to resolve is fatal before any filesystem mutation.
pub fn resolve_compressor(override_path: Option<String>) -> Result<PathBuf, TuneError> {
    let candidates: Vec<String> = match override_path {
        Some(path) => vec![path],
        None => {
            let mut candidates = vec!["7zz".to_string(), "7z".to_string()];
            if cfg!(windows) {
                candidates.push(r"C:\Program Files\7-Zip\7z.exe".to_string());
                candidates.push(r"C:\Program Files\NanaZip\7z.exe".to_string());
            }
            candidates
        }
    };
    for candidate in &candidates {
        if command_available(candidate, &["i"]) {
            return Ok(PathBuf::from(candidate));
        }
    }
    Err(TuneError::CompressorNotFound)
}

fn command_available(bin: &str, args: &[&str]) -> bool {
    Command::new(bin)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Invokes the external compressor once per input item and owns the artifact
/// lifecycle for the current candidate.
pub struct ArchiveRunner {
    compressor: PathBuf,
    workspace: PathBuf,
    artifacts: Vec<PathBuf>,
}

impl ArchiveRunner {
    pub fn new(compressor: PathBuf, workspace: PathBuf) -> Self {
        Self { compressor, workspace, artifacts: Vec::new() }
    }

    /// Compress every item under one candidate flag, producing one
    /// `<item>.7z` artifact per item in the workspace. Invocations run
    /// sequentially with stdout discarded; a spawn failure or non-zero exit
    /// aborts immediately, naming the failing item and candidate, since a
    /// missing artifact would silently under-count this candidate's total.
    pub fn compress_all(
        &mut self,
        items: &[InputItem],
        flag: &str,
        candidate: &str,
    ) -> Result<(), TuneError> {
        for item in items {
            let mut archive_name = item.name().to_os_string();
            archive_name.push(".");
            archive_name.push(ARCHIVE_EXTENSION);
            let status = Command::new(&self.compressor)
                .current_dir(&self.workspace)
                .arg("a")
                .arg("-mx9")
                .arg(flag)
                .arg("--")
                .arg(&archive_name)
                .arg(item.name())
                .stdout(Stdio::null())
                .status()
                .map_err(|source| TuneError::Io { source, path: self.compressor.clone() })?;
            if !status.success() {
                return Err(TuneError::CompressorFailed {
                    item: item.name().to_string_lossy().into_owned(),
                    value: candidate.to_string(),
                    code: status.code(),
                });
            }
            self.artifacts.push(self.workspace.join(&archive_name));
        }
        Ok(())
    }

    /// Sum of the artifact sizes recorded for the current candidate.
    pub fn total_artifact_size(&self) -> Result<u64, TuneError> {
        let mut total = 0u64;
        for path in &self.artifacts {
            total += fs::metadata(path)
                .map_err(|source| TuneError::Io { source, path: path.clone() })?
                .len();
        }
        Ok(total)
    }

    /// Delete the current candidate's artifacts. Called once between
    /// candidates; a skipped clear would fold stale artifacts into the next
    /// candidate's total.
    pub fn clear_artifacts(&mut self) -> Result<(), TuneError> {
        while let Some(path) = self.artifacts.pop() {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(TuneError::Io { source, path }),
            }
        }
        Ok(())
    }

    /// Bulk-delete every archive-suffixed file in the workspace, tracked or
    /// not. Run once at driver startup so leftovers from an interrupted
    /// earlier run cannot pollute the first candidate's total.
    pub fn clear_stale_artifacts(&mut self) -> Result<(), TuneError> {
        let entries = fs::read_dir(&self.workspace)
            .map_err(|source| TuneError::Io { source, path: self.workspace.clone() })?;
        for entry in entries {
            let entry = entry
                .map_err(|source| TuneError::Io { source, path: self.workspace.clone() })?;
            let path = entry.path();
            let is_file = entry
                .file_type()
                .map_err(|source| TuneError::Io { source, path: path.clone() })?
                .is_file();
            if is_file && path.extension() == Some(OsStr::new(ARCHIVE_EXTENSION)) {
                fs::remove_file(&path)
                    .map_err(|source| TuneError::Io { source, path: path.clone() })?;
            }
        }
        self.artifacts.clear();
        Ok(())
    }

    #[cfg(test)]
    fn track(&mut self, path: PathBuf) {
        self.artifacts.push(path);
    }
}
