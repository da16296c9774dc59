// Counters collected while a builder runs.

use std::fmt;

/// Snapshot of a build's progress and automaton size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Samples that added a new word.
    pub samples_merged: usize,
    /// Re-insertions of a word with the value it already had.
    pub duplicates_skipped: usize,
    /// Re-insertions with a different value, ignored under first-wins.
    pub conflicts_ignored: usize,
    /// Fresh states allocated to extend a word's suffix.
    pub states_created: usize,
    /// Copies made of confluence states.
    pub states_cloned: usize,
    /// Fresh or copied states that turned out equal to a canonical state.
    pub states_collapsed: usize,
    /// Distinct classification values (terminal states).
    pub distinct_values: usize,
    /// Canonical states indexed by height; index 0 is unused.
    pub states_per_height: Vec<usize>,
    /// Arena slots in use, terminals included.
    pub live_states: usize,
    /// Arena slots waiting for reuse.
    pub free_slots: usize,
}

impl BuildStats {
    /// Canonical inner states, which is the row count of the compacted table.
    pub fn canonical_states(&self) -> usize {
        self.states_per_height.iter().sum()
    }
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} words, {} states, {} values ({} duplicates, {} conflicts ignored, {} created, {} cloned, {} collapsed)",
            self.samples_merged,
            self.canonical_states(),
            self.distinct_values,
            self.duplicates_skipped,
            self.conflicts_ignored,
            self.states_created,
            self.states_cloned,
            self.states_collapsed,
        )
    }
}
