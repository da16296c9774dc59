//! Build-time side of flatdfa: incremental construction of a minimal automaton
//! for a fixed-length word classifier, compacted into a
//! [`TransitionTable`].
//!
//! Samples can arrive in any order. After every insert the automaton is the
//! minimal one for the words seen so far: states are hash-consed per height,
//! states shared by several words are cloned before they change, and the
//! path of a new word is re-minimized bottom-up.
//!
//! # Architecture
//!
//! - [`builder`] -- `DfaBuilder`: the build session (insert, inspect, finish)
//! - [`options`] -- `BuildOptions`: word shape and duplicate handling
//! - [`stats`] -- `BuildStats`: counters reported by a session
//! - `graph` -- State arena with incoming-edge counts
//! - `pool` -- Per-height canonical state pools and the terminal pool
//! - `merge` -- Insertion of one word with clone-on-confluence
//! - `compact` -- Breadth-first numbering into flat rows
//!
//! ```
//! use flatdfa_build::{BuildOptions, build};
//! use flatdfa_core::Sample;
//!
//! let samples = [
//!     Sample::new([0, 0], 10),
//!     Sample::new([0, 1], 20),
//!     Sample::new([1, 0], 20),
//!     Sample::new([1, 1], 30),
//! ];
//! let table = build(&samples, BuildOptions::default()).unwrap();
//! assert_eq!(table.transitions(), &[2, 4, 10, 20, 20, 30]);
//! ```

pub mod builder;
mod compact;
mod graph;
mod merge;
pub mod options;
mod pool;
pub mod stats;

pub use builder::DfaBuilder;
pub use graph::StateId;
pub use options::{BuildOptions, DuplicatePolicy};
pub use stats::BuildStats;

use flatdfa_core::{Sample, Symbol, Value, WordError};
use flatdfa_table::{TableError, TransitionTable};
use tracing::debug;

/// Error type for building a table.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid word: {0}")]
    Word(#[from] WordError),
    #[error("word {word:?} already maps to {existing}, refusing {rejected}")]
    Conflict {
        word: Vec<Symbol>,
        existing: Value,
        rejected: Value,
    },
    #[error("automaton with {states} states of {alphabet_size} slots exceeds the i32 offset range")]
    TableTooLarge { states: usize, alphabet_size: usize },
    #[error("table assembly failed: {0}")]
    Table(#[from] TableError),
}

/// Build the minimal table for a batch of samples.
///
/// Shape fields missing from `options` are inferred from the samples. An empty
/// batch needs both fields set and yields a table with only the start state.
pub fn build(samples: &[Sample], options: BuildOptions) -> Result<TransitionTable, BuildError> {
    let shape = options.resolve_shape(samples)?;
    let mut builder = DfaBuilder::new(shape, options);
    builder.insert_all(samples)?;
    let stats = builder.stats();
    debug!(%stats, "samples merged");
    builder.finish()
}
