//! Shared vocabulary for the flatdfa crates.
//!
//! A classifier table maps fixed-length words over a small integer alphabet
//! to `i32` values. This crate holds the pieces both the builder and the
//! runtime table agree on:
//!
//! - [`sample`] -- `(word, value)` training pairs
//! - [`shape`] -- alphabet size and word length of one build, word validation

pub mod sample;
pub mod shape;

pub use sample::Sample;
pub use shape::Shape;

/// One input symbol. Valid symbols are `0..alphabet_size`.
pub type Symbol = u32;

/// Classification result stored in a table.
pub type Value = i32;

/// Sentinel stored in table slots that no word ever reaches.
pub const NULL_TRANSITION: i32 = -1;

/// Error type for words that do not fit a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("word has {actual} symbols, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("symbol {symbol} at position {position} is outside the alphabet of size {alphabet_size}")]
    SymbolOutOfRange {
        position: usize,
        symbol: Symbol,
        alphabet_size: usize,
    },
    #[error("alphabet size must be at least 1")]
    EmptyAlphabet,
    #[error("word length must be at least 1")]
    EmptyWord,
    #[error("cannot infer a shape from an empty sample set")]
    NoSamples,
}
