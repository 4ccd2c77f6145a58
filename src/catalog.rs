//! Static parameter catalogs for the tunable 7-Zip dimensions.
//!
//! Each dimension exposes an ordered table of [`ParameterValue`]s, smallest
//! magnitude first. Ascending order is load-bearing: the dictionary-size
//! pruning heuristic and the sweep's "halt at the first value past the bound"
//! rule both rely on it, so it is asserted when a table is first built.
//! A malformed table entry is a programming error and panics at that point,
//! never mid-sweep.

use std::sync::OnceLock;

/// The tunable dimension a catalog entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Match-finder word size (`-mfb`), a plain byte count.
    WordSize,
    /// LZMA dictionary size (`-md`).
    DictionarySize,
    /// Solid block size. Modeled for completeness; no sweep is offered for it.
    BlockSize,
}

/// One entry in a catalog dimension: the raw text passed to 7-Zip plus its
/// parsed magnitude in bytes, comparable within the dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    raw: &'static str,
    bytes: u64,
    dimension: Dimension,
}

impl ParameterValue {
    /// The textual form exactly as the external compressor expects it.
    pub fn raw(&self) -> &'static str {
        self.raw
    }

    /// Parsed magnitude, normalized to bytes.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }
}

const WORD_SIZE_TABLE: &[&str] = &[
    "8", "12", "16", "24", "32", "48", "64", "96", "128", "192", "256", "273",
];

const DICT_SIZE_TABLE: &[&str] = &[
    "64k", "1m", "2m", "3m", "4m", "6m", "8m", "12m", "16m", "24m", "32m", "48m", "64m", "96m",
    "128m", "192m", "256m", "384m", "512m", "768m", "1024m", "1536m",
];

const BLOCK_SIZE_TABLE: &[&str] = &[
    "off", "on", "1m", "2m", "3m", "4m", "6m", "8m", "12m", "16m", "32m", "64m", "128m", "256m",
    "512m", "1g", "2g", "4g", "8g", "16g", "32g", "64g",
];

/// Parse a catalog entry's magnitude. Bare integers are byte counts;
/// `k`/`m`/`g` suffixes scale by binary units. The block-size toggles `off`
/// and `on` map to 0 and 1 so every table entry stays comparable.
fn parse_magnitude(raw: &str) -> Option<u64> {
    match raw {
        "off" => return Some(0),
        "on" => return Some(1),
        _ => {}
    }
    let (digits, multiplier) = match raw.as_bytes().last()? {
        b'k' => (&raw[..raw.len() - 1], 1024u64),
        b'm' => (&raw[..raw.len() - 1], 1024 * 1024),
        b'g' => (&raw[..raw.len() - 1], 1024 * 1024 * 1024),
        _ => (raw, 1),
    };
    digits.parse::<u64>().ok()?.checked_mul(multiplier)
}

fn build(dimension: Dimension, table: &'static [&'static str]) -> Vec<ParameterValue> {
    assert!(!table.is_empty(), "empty catalog for {dimension:?}");
    let mut values = Vec::with_capacity(table.len());
    let mut previous: Option<u64> = None;
    for &raw in table {
        let bytes = match parse_magnitude(raw) {
            Some(bytes) => bytes,
            None => panic!("malformed catalog entry '{raw}' in {dimension:?}"),
        };
        if let Some(previous) = previous {
            assert!(
                bytes > previous,
                "catalog for {dimension:?} not strictly ascending at '{raw}'"
            );
        }
        previous = Some(bytes);
        values.push(ParameterValue { raw, bytes, dimension });
    }
    values
}

/// Match-finder word sizes, ascending.
pub fn word_sizes() -> &'static [ParameterValue] {
    static TABLE: OnceLock<Vec<ParameterValue>> = OnceLock::new();
    TABLE.get_or_init(|| build(Dimension::WordSize, WORD_SIZE_TABLE))
}

/// Dictionary sizes, ascending.
pub fn dict_sizes() -> &'static [ParameterValue] {
    static TABLE: OnceLock<Vec<ParameterValue>> = OnceLock::new();
    TABLE.get_or_init(|| build(Dimension::DictionarySize, DICT_SIZE_TABLE))
}

/// Solid block sizes, ascending (`off` and `on` sort below any sized entry).
pub fn block_sizes() -> &'static [ParameterValue] {
    static TABLE: OnceLock<Vec<ParameterValue>> = OnceLock::new();
    TABLE.get_or_init(|| build(Dimension::BlockSize, BLOCK_SIZE_TABLE))
}

/// The smallest dictionary-size entry strictly larger than the largest
/// input's byte size. Dictionaries beyond that cannot improve compression for
/// any input, so the sweep stops there. When even the largest table entry is
/// not bigger than the input, the bound degrades to that last entry and the
/// sweep tests everything.
pub fn dictionary_bound(largest_input: u64) -> &'static ParameterValue {
    let table = dict_sizes();
    match table.iter().find(|value| value.bytes > largest_input) {
        Some(value) => value,
        None => &table[table.len() - 1],
    }
}
