use std::path::PathBuf;

/// The primary error type for all operations in the `archtune` crate.
#[derive(Debug)]
pub enum TuneError {
    /// An I/O error occurred, typically while reading, deleting, or measuring
    /// a file. Includes the path where the error happened.
    Io { source: std::io::Error, path: PathBuf },

    /// No usable 7-Zip binary could be resolved at startup.
    CompressorNotFound,

    /// A single compressor invocation failed. Carries the input item and the
    /// candidate value under test so the failing pair can be reported, plus
    /// the exit code when the process was not killed by a signal.
    CompressorFailed {
        item: String,
        value: String,
        code: Option<i32>,
    },

    /// Best-candidate selection was asked to pick from an empty sweep result.
    EmptySweep,

    /// An error during serialization of the JSON report.
    SerdeJson(serde_json::Error),
}

impl std::fmt::Display for TuneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuneError::Io { source, path } => {
                write!(f, "I/O error on path '{}': {}", path.display(), source)
            }
            TuneError::CompressorNotFound => write!(
                f,
                "no usable 7-Zip binary found (tried --compressor / ARCHTUNE_7Z, then 7zz and 7z on PATH)"
            ),
            TuneError::CompressorFailed { item, value, code } => match code {
                Some(code) => write!(
                    f,
                    "compressor exited with status {} for item '{}' under candidate {}",
                    code, item, value
                ),
                None => write!(
                    f,
                    "compressor was terminated by a signal for item '{}' under candidate {}",
                    item, value
                ),
            },
            TuneError::EmptySweep => {
                write!(f, "internal consistency failure: sweep recorded no candidates")
            }
            TuneError::SerdeJson(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for TuneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuneError::Io { source, .. } => Some(source),
            TuneError::SerdeJson(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuneError {
    fn from(err: serde_json::Error) -> Self {
        TuneError::SerdeJson(err)
    }
}

// Generic IO error conversion that doesn't require a path
impl From<std::io::Error> for TuneError {
    fn from(err: std::io::Error) -> Self {
        TuneError::Io { source: err, path: PathBuf::new() }
    }
}
