//! # archtune Core Library
//!
//! This crate provides the core functionality for the `archtune` parameter
//! tuning harness.
//!
//! It compresses every directory in a workspace with 7-Zip once per candidate
//! parameter value, totals the resulting archive sizes, and reports the
//! candidate that produced the smallest total. The dictionary-size search is
//! pruned using the largest input's on-disk size: a dictionary larger than
//! the biggest input cannot improve compression, so such candidates are never
//! measured.
//!
//! ## Key Modules
//!
//! - [`catalog`]: Static ordered tables of legal parameter values per dimension.
//! - [`inventory`]: Workspace enumeration and recursive input sizing.
//! - [`runner`]: 7-Zip resolution, per-item invocation, and artifact lifecycle.
//! - [`sweep`]: The per-candidate benchmarking loop and best-candidate selection.
//! - [`driver`]: End-to-end orchestration behind the CLI.

pub mod catalog;
pub mod cli;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod runner;
pub mod sweep;

pub use error::TuneError;
