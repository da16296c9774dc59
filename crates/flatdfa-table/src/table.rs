// Flat transition table: checked construction, lookup and binary encoding.

use std::ops::Range;

use bit_set::BitSet;
use flatdfa_core::{NULL_TRANSITION, Shape, Symbol, Value, WordError};

use crate::TableError;
use crate::format::{self, HEADER_SIZE, TableHeader};

/// A compacted classifier: one row of `alphabet_size` slots per state.
///
/// State ids are dense and grouped by depth: the start state is id 0, then
/// every state one symbol deep, and so on. A slot in a row that is not on the
/// last level holds the base offset (`id * alphabet_size`) of the next state
/// or [`NULL_TRANSITION`]. A slot on the last level holds the classification
/// value of the word that ends there, and its index is a *result index*.
///
/// The table is immutable once built. Every constructor validates the layout,
/// so lookups never index out of bounds.
#[derive(Clone, PartialEq, Eq)]
pub struct TransitionTable {
    shape: Shape,
    transitions: Vec<i32>,
    /// Slots holding a classification value rather than an offset.
    results: BitSet,
    /// Base offset of every state row, in id order.
    entry_states: Vec<usize>,
    /// State ids at each depth (index 0 is the start state).
    levels: Vec<Range<usize>>,
}

impl std::fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionTable")
            .field("alphabet_size", &self.shape.alphabet_size())
            .field("word_length", &self.shape.word_length())
            .field("state_count", &self.state_count())
            .field("result_count", &self.result_count())
            .finish()
    }
}

impl TransitionTable {
    /// Assemble a table from its transitions and result indexes.
    ///
    /// Checks that the rows form a layered automaton reachable from state 0,
    /// that every offset points at a state one level deeper, and that the
    /// result indexes are exactly the populated final slots (plus any final
    /// slot whose value happens to equal the null sentinel).
    pub fn new(shape: Shape, transitions: Vec<i32>, results: BitSet) -> Result<Self, TableError> {
        let alphabet_size = shape.alphabet_size();
        let states = transitions.len() / alphabet_size;
        if states == 0 || transitions.len() % alphabet_size != 0 {
            return Err(TableError::LengthMismatch {
                len: transitions.len(),
                states,
                alphabet_size,
            });
        }
        if (states - 1)
            .checked_mul(alphabet_size)
            .is_none_or(|max| max > i32::MAX as usize)
        {
            return Err(TableError::TooLarge {
                states,
                alphabet_size,
            });
        }

        let levels = scan_levels(shape, &transitions)?;
        check_results(shape, &transitions, &results, &levels)?;

        let entry_states = (0..states).map(|id| id * alphabet_size).collect();

        Ok(Self {
            shape,
            transitions,
            results,
            entry_states,
            levels,
        })
    }

    /// Load a table from its binary form (see [`format`]).
    pub fn from_bytes(data: &[u8]) -> Result<Self, TableError> {
        let header = format::parse_header(data)?;
        let expected = header.file_size();
        if data.len() < expected {
            return Err(TableError::TooShort {
                expected,
                actual: data.len(),
            });
        }
        if data.len() > expected {
            return Err(TableError::TrailingBytes {
                extra: data.len() - expected,
            });
        }

        let shape = Shape::new(header.alphabet_size as usize, header.word_length as usize)?;
        let slots = header.slot_count();
        let bitmap_start = HEADER_SIZE + slots * size_of::<i32>();

        // Copy into aligned buffers; the source slice may not be 4-byte aligned.
        let mut transitions = vec![0i32; slots];
        bytemuck::cast_slice_mut::<i32, u8>(&mut transitions)
            .copy_from_slice(&data[HEADER_SIZE..bitmap_start]);
        for v in &mut transitions {
            *v = i32::from_le(*v);
        }

        let mut bitmap = vec![0u32; header.bitmap_words()];
        bytemuck::cast_slice_mut::<u32, u8>(&mut bitmap).copy_from_slice(&data[bitmap_start..]);

        let mut results = BitSet::with_capacity(slots);
        for (word_index, word) in bitmap.iter().enumerate() {
            let mut bits = u32::from_le(*word);
            while bits != 0 {
                let index = word_index * 32 + bits.trailing_zeros() as usize;
                if index >= slots {
                    return Err(TableError::MisplacedResult { index });
                }
                results.insert(index);
                bits &= bits - 1;
            }
        }

        Self::new(shape, transitions, results)
    }

    /// Encode the table into its binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        let too_large = || TableError::TooLarge {
            states: self.state_count(),
            alphabet_size: self.shape.alphabet_size(),
        };
        let header = TableHeader {
            alphabet_size: u32::try_from(self.shape.alphabet_size()).map_err(|_| too_large())?,
            word_length: u32::try_from(self.shape.word_length()).map_err(|_| too_large())?,
            state_count: u32::try_from(self.state_count()).map_err(|_| too_large())?,
        };

        let mut out = Vec::with_capacity(header.file_size());
        out.extend_from_slice(&header.to_bytes());

        let encoded: Vec<i32> = self.transitions.iter().map(|v| v.to_le()).collect();
        out.extend_from_slice(bytemuck::cast_slice(&encoded));

        let mut bitmap = vec![0u32; header.bitmap_words()];
        for index in self.results.iter() {
            bitmap[index / 32] |= 1 << (index % 32);
        }
        for word in &mut bitmap {
            *word = word.to_le();
        }
        out.extend_from_slice(bytemuck::cast_slice(&bitmap));

        Ok(out)
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn alphabet_size(&self) -> usize {
        self.shape.alphabet_size()
    }

    #[inline]
    pub fn word_length(&self) -> usize {
        self.shape.word_length()
    }

    /// The raw flat array.
    #[inline]
    pub fn transitions(&self) -> &[i32] {
        &self.transitions
    }

    /// Number of slots in the flat array (`state_count * alphabet_size`).
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.transitions.len()
    }

    #[inline]
    pub fn state_count(&self) -> usize {
        self.entry_states.len()
    }

    /// Base offset of every state row, in id order. The start state is at 0.
    pub fn entry_states(&self) -> &[usize] {
        &self.entry_states
    }

    /// State ids whose rows sit `height` symbols before the end of a word.
    ///
    /// Height `word_length` is the start state alone; height 1 holds the rows
    /// whose slots are results. Heights outside `1..=word_length` are empty.
    pub fn states_at_height(&self, height: usize) -> Range<usize> {
        let word_length = self.shape.word_length();
        if height == 0 || height > word_length {
            return 0..0;
        }
        self.levels[word_length - height].clone()
    }

    /// The set of slot indexes that hold classification values.
    pub fn results(&self) -> &BitSet {
        &self.results
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Whether the slot at `index` holds a classification value.
    #[inline]
    pub fn is_result(&self, index: usize) -> bool {
        self.results.contains(index)
    }

    /// Whether the slot at `index` was never produced by any inserted word.
    ///
    /// Indexes past the end of the table are null.
    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        match self.transitions.get(index) {
            Some(&value) => value == NULL_TRANSITION && !self.is_result(index),
            None => true,
        }
    }

    /// Slot index for `symbol` in the row starting at `offset`.
    #[inline]
    pub fn step(offset: usize, symbol: Symbol) -> usize {
        offset + symbol as usize
    }

    /// Raw walk following the lookup contract, without shape validation.
    ///
    /// Returns the value read at the last step. The walk stops early and
    /// returns [`NULL_TRANSITION`] when it reaches a null slot or leaves the
    /// table, so a `-1` result is ambiguous; use [`lookup`](Self::lookup)
    /// when that matters.
    pub fn walk(&self, word: &[Symbol]) -> i32 {
        let mut current: i32 = 0;
        for &symbol in word {
            let Ok(offset) = usize::try_from(current) else {
                return NULL_TRANSITION;
            };
            let index = Self::step(offset, symbol);
            if self.is_null(index) {
                return NULL_TRANSITION;
            }
            current = self.transitions[index];
        }
        current
    }

    /// Classify `word`.
    ///
    /// Returns `Ok(None)` when the word was never inserted and its walk hits a
    /// null slot.
    pub fn lookup(&self, word: &[Symbol]) -> Result<Option<Value>, WordError> {
        self.shape.check_word(word)?;
        let mut offset = 0usize;
        let mut value = NULL_TRANSITION;
        for (depth, &symbol) in word.iter().enumerate() {
            let index = Self::step(offset, symbol);
            if self.is_null(index) {
                return Ok(None);
            }
            value = self.transitions[index];
            if depth + 1 < word.len() {
                // Non-final slots were validated as state offsets.
                offset = value as usize;
            }
        }
        Ok(Some(value))
    }

    /// Depth at which the walk for `word` hits a null slot, if it does.
    pub fn divergence(&self, word: &[Symbol]) -> Result<Option<usize>, WordError> {
        self.shape.check_word(word)?;
        let mut offset = 0usize;
        for (depth, &symbol) in word.iter().enumerate() {
            let index = Self::step(offset, symbol);
            if self.is_null(index) {
                return Ok(Some(depth));
            }
            if depth + 1 < word.len() {
                offset = self.transitions[index] as usize;
            }
        }
        Ok(None)
    }
}

/// Walk the rows level by level and return the state id range of each depth.
fn scan_levels(shape: Shape, transitions: &[i32]) -> Result<Vec<Range<usize>>, TableError> {
    let alphabet_size = shape.alphabet_size();
    let word_length = shape.word_length();
    let states = transitions.len() / alphabet_size;

    let mut levels = Vec::with_capacity(word_length);
    let mut level = 0..1;

    for depth in 0..word_length {
        levels.push(level.clone());
        if depth + 1 == word_length {
            break;
        }

        let next_start = level.end;
        let mut next_end = next_start;
        let mut seen = BitSet::new();
        for index in level.start * alphabet_size..level.end * alphabet_size {
            let value = transitions[index];
            if value == NULL_TRANSITION {
                continue;
            }
            let child = usize::try_from(value)
                .ok()
                .filter(|v| v % alphabet_size == 0)
                .map(|v| v / alphabet_size)
                .filter(|c| *c >= next_start && *c < states)
                .ok_or(TableError::CorruptOffset { index, value })?;
            seen.insert(child - next_start);
            next_end = next_end.max(child + 1);
        }

        if let Some(state) = (next_start..next_end).find(|s| !seen.contains(s - next_start)) {
            return Err(TableError::UnreachableState { state });
        }
        level = next_start..next_end;
    }

    let covered = levels.last().map_or(0, |l| l.end);
    if covered != states {
        return Err(TableError::UnreachableState { state: covered });
    }
    Ok(levels)
}

/// Result indexes must cover every populated final slot and nothing else.
fn check_results(
    shape: Shape,
    transitions: &[i32],
    results: &BitSet,
    levels: &[Range<usize>],
) -> Result<(), TableError> {
    let alphabet_size = shape.alphabet_size();
    let last = levels.last().cloned().unwrap_or(0..0);
    let final_slots = last.start * alphabet_size..last.end * alphabet_size;

    if let Some(index) = results.iter().find(|i| !final_slots.contains(i)) {
        return Err(TableError::MisplacedResult { index });
    }
    for index in final_slots {
        let value = transitions[index];
        if value != NULL_TRANSITION && !results.contains(index) {
            return Err(TableError::MissingResult { index, value });
        }
    }
    Ok(())
}
