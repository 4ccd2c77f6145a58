use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Which parameter dimension to sweep. Only the dictionary-size sweep is
    /// pruned by the largest input's size; the word-size sweep walks its full table.
    #[arg(long, value_enum, default_value_t = SweepTarget::Dict)]
    pub dimension: SweepTarget,

    /// Directory whose immediate child directories are compressed. Defaults to the current directory.
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Path to the 7-Zip binary. If not provided, will try ARCHTUNE_7Z, then probe 7zz and 7z on PATH.
    #[arg(long)]
    pub compressor: Option<String>,

    /// Emit the sweep result and best candidate as a JSON document on stdout (progress moves to stderr).
    #[arg(long)]
    pub json: bool,
}

/// The tunable dimension selectable from the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SweepTarget {
    /// Dictionary size (-md), pruned by the largest input's size.
    Dict,
    /// Match-finder word size (-mfb), full table.
    Word,
}

/// Gets the compressor override from the command-line option or the `ARCHTUNE_7Z` environment variable.
///
/// Priority:
/// 1. `--compressor` command-line argument.
/// 2. `ARCHTUNE_7Z` environment variable.
/// 3. Returns `None` if neither is present, letting the caller probe PATH.
pub fn compressor_from_opt_or_env(compressor_opt: Option<String>) -> Option<String> {
    if let Some(path) = compressor_opt {
        return Some(path);
    }
    std::env::var("ARCHTUNE_7Z").ok()
}

/// Parses command-line arguments using `clap` and returns them, or an error if parsing fails.
pub fn run() -> Result<Args, clap::Error> {
    Args::try_parse()
}
