//! End-to-end orchestration: resolve the compressor, take inventory, clear
//! stale artifacts, run the sweep, select the best candidate, report.

use std::env;
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{self, Args, SweepTarget};
use crate::error::TuneError;
use crate::inventory::WorkspaceInventory;
use crate::runner::{self, ArchiveRunner};
use crate::sweep::{self, BestCandidate, SweepDimension, SweepEntry, Sweeper};

/// Machine-readable sweep report, emitted behind `--json`.
#[derive(Debug, Serialize)]
pub struct TuneReport {
    pub dimension: &'static str,
    pub workspace: String,
    pub inputs: usize,
    pub results: Vec<SweepEntry>,
    pub best: BestCandidate,
}

pub fn run(args: &Args) -> Result<(), TuneError> {
    let workspace = match &args.workspace {
        Some(path) => path.clone(),
        None => env::current_dir()
            .map_err(|source| TuneError::Io { source, path: PathBuf::from(".") })?,
    };

    // Fatal before any filesystem mutation.
    let compressor =
        runner::resolve_compressor(cli::compressor_from_opt_or_env(args.compressor.clone()))?;

    let inventory = WorkspaceInventory::scan(&workspace)?;
    let mut archive_runner = ArchiveRunner::new(compressor, workspace.clone());
    archive_runner.clear_stale_artifacts()?;

    let dimension = match args.dimension {
        SweepTarget::Dict => SweepDimension::Dictionary,
        SweepTarget::Word => SweepDimension::WordSize,
    };
    let label = dimension.label();
    let json = args.json;

    let mut sweeper = Sweeper::new(&inventory, &mut archive_runner);
    let result = sweeper.run(dimension, |value| {
        if json {
            eprintln!("{label}: {}", value.raw());
        } else {
            println!("{label}: {}", value.raw());
        }
    })?;
    let best = sweep::select_best(&result)?;

    if json {
        let report = TuneReport {
            dimension: dimension.name(),
            workspace: workspace.display().to_string(),
            inputs: inventory.items().len(),
            results: result.entries().to_vec(),
            best,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("{:<12} {:>14}", "Candidate", "Total size");
        for entry in result.entries() {
            println!("{:<12} {:>14}", entry.value, format_bytes(entry.total_bytes));
        }
        println!();
        println!(
            "Best {}: {} ({})",
            label.to_lowercase(),
            best.value,
            format_bytes(best.total_bytes)
        );
    }
    Ok(())
}

// Helper to format bytes into a readable string
fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;

    if bytes >= GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
