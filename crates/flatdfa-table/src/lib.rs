//! Runtime side of flatdfa: the flat transition table.
//!
//! A table maps every word of a fixed [`Shape`](flatdfa_core::Shape) to a
//! classification value with one array read per symbol:
//!
//! ```text
//! current = 0
//! for symbol in word:
//!     current = transitions[current + symbol]
//! return current
//! ```
//!
//! Intermediate reads yield the base offset of the next state row; the last
//! read yields the value itself.
//!
//! # Architecture
//!
//! - [`table`] -- `TransitionTable`: lookup, `is_null`/`is_result`, layout checks
//! - [`format`] -- Binary header parsing and writing
//! - [`document`] -- JSON document form of a table
//! - [`verify`] -- Round-trip and minimality checks

pub mod document;
pub mod format;
pub mod table;
pub mod verify;

pub use table::TransitionTable;
pub use verify::VerifyError;

use flatdfa_core::WordError;

/// Error type for loading or assembling a transition table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("invalid magic number in table header")]
    InvalidMagic,
    #[error("unsupported table format version {0}")]
    UnsupportedVersion(u32),
    #[error("reserved header field is not zero")]
    ReservedNotZero,
    #[error("data too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("{extra} unexpected bytes after the result bitmap")]
    TrailingBytes { extra: usize },
    #[error("transition count {len} does not match {states} states of {alphabet_size} slots")]
    LengthMismatch {
        len: usize,
        states: usize,
        alphabet_size: usize,
    },
    #[error("slot {index} holds {value}, which is not a state offset at the next height")]
    CorruptOffset { index: usize, value: i32 },
    #[error("state {state} is not reachable from the start state")]
    UnreachableState { state: usize },
    #[error("slot {index} is marked as a result but is not a final transition")]
    MisplacedResult { index: usize },
    #[error("final transition slot {index} holds {value} but is not marked as a result")]
    MissingResult { index: usize, value: i32 },
    #[error("table with {states} states of {alphabet_size} slots exceeds the i32 offset range")]
    TooLarge { states: usize, alphabet_size: usize },
    #[error("invalid shape: {0}")]
    Shape(#[from] WordError),
}
