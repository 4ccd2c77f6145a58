//! The per-candidate benchmarking loop and best-candidate selection.
//!
//! A sweep walks one dimension's catalog in ascending order. Per candidate:
//! compress every input, total the artifact sizes, record the pair, clear the
//! artifacts. The dictionary dimension halts the whole loop at the first
//! candidate past the computed bound; compression size is not monotonic in
//! dictionary size in general, so everything below the bound is measured
//! exhaustively rather than binary-searched. The word-size dimension walks
//! its full table, since no cheap upper bound is known for it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{self, ParameterValue};
use crate::error::TuneError;
use crate::inventory::WorkspaceInventory;
use crate::runner::ArchiveRunner;

/// A dimension the sweep engine can walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDimension {
    Dictionary,
    WordSize,
}

impl SweepDimension {
    pub fn catalog(self) -> &'static [ParameterValue] {
        match self {
            SweepDimension::Dictionary => catalog::dict_sizes(),
            SweepDimension::WordSize => catalog::word_sizes(),
        }
    }

    /// Progress-line label, matching the tool's historical wording.
    pub fn label(self) -> &'static str {
        match self {
            SweepDimension::Dictionary => "Dict size",
            SweepDimension::WordSize => "Word size",
        }
    }

    /// Short name used in the JSON report.
    pub fn name(self) -> &'static str {
        match self {
            SweepDimension::Dictionary => "dict",
            SweepDimension::WordSize => "word",
        }
    }

    /// The compressor flag for one candidate of this dimension.
    pub fn flag_for(self, value: &ParameterValue) -> String {
        match self {
            SweepDimension::Dictionary => format!("-md{}", value.raw()),
            SweepDimension::WordSize => format!("-mfb{}", value.raw()),
        }
    }
}

/// One measured candidate: its raw textual form and the total artifact size
/// it produced across all inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepEntry {
    pub value: String,
    pub total_bytes: u64,
}

/// Candidates measured by one sweep, append-only in catalog order.
#[derive(Debug, Default)]
pub struct SweepResult {
    entries: Vec<SweepEntry>,
}

impl SweepResult {
    pub fn record(&mut self, value: &str, total_bytes: u64) {
        self.entries.push(SweepEntry { value: value.to_string(), total_bytes });
    }

    pub fn entries(&self) -> &[SweepEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_for(&self, value: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| entry.total_bytes)
    }
}

/// The winning candidate of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestCandidate {
    pub value: String,
    pub total_bytes: u64,
}

/// The candidate with the minimum total size. Ties resolve to the entry
/// earliest in catalog order: equal compression for a smaller parameter means
/// lower resource cost. An empty result is an internal-consistency failure,
/// since the bound computation guarantees at least one candidate.
pub fn select_best(result: &SweepResult) -> Result<BestCandidate, TuneError> {
    let mut best: Option<&SweepEntry> = None;
    for entry in result.entries() {
        match best {
            Some(current) if entry.total_bytes >= current.total_bytes => {}
            _ => best = Some(entry),
        }
    }
    best.map(|entry| BestCandidate { value: entry.value.clone(), total_bytes: entry.total_bytes })
        .ok_or(TuneError::EmptySweep)
}

/// Runs one sweep over a dimension, strictly sequentially: one subprocess at
/// a time, one artifact set on disk at a time.
pub struct Sweeper<'a> {
    inventory: &'a WorkspaceInventory,
    runner: &'a mut ArchiveRunner,
    cancel: Arc<AtomicBool>,
}

impl<'a> Sweeper<'a> {
    pub fn new(inventory: &'a WorkspaceInventory, runner: &'a mut ArchiveRunner) -> Self {
        Self { inventory, runner, cancel: Arc::new(AtomicBool::new(false)) }
    }

    /// Cooperative cancellation flag. Checked between candidates only; an
    /// in-flight compressor invocation is never interrupted. A cancelled
    /// sweep returns the candidates measured so far.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Walk the dimension's catalog, invoking `on_candidate` before each
    /// candidate is measured. The dictionary sweep halts (not skips) at the
    /// first candidate whose magnitude exceeds the bound.
    pub fn run<F>(
        &mut self,
        dimension: SweepDimension,
        mut on_candidate: F,
    ) -> Result<SweepResult, TuneError>
    where
        F: FnMut(&ParameterValue),
    {
        let bound = match dimension {
            SweepDimension::Dictionary => {
                Some(catalog::dictionary_bound(self.inventory.largest_input_size()?).bytes())
            }
            SweepDimension::WordSize => None,
        };
        let mut result = SweepResult::default();
        for value in dimension.catalog() {
            if let Some(bound) = bound {
                if value.bytes() > bound {
                    break;
                }
            }
            if self.cancel.load(Ordering::Relaxed) {
                break;
            }
            on_candidate(value);
            let flag = dimension.flag_for(value);
            self.runner.compress_all(self.inventory.items(), &flag, value.raw())?;
            let total = self.runner.total_artifact_size()?;
            result.record(value.raw(), total);
            self.runner.clear_artifacts()?;
        }
        Ok(result)
    }
}
