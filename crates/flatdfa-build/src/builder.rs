// Builder session: owns the graph and pools of one build until compaction.

use flatdfa_core::{Sample, Shape, Symbol, Value};
use flatdfa_table::TransitionTable;
use tracing::debug;

use crate::BuildError;
use crate::compact;
use crate::graph::{Graph, StateId};
use crate::merge::MergeOutcome;
use crate::options::BuildOptions;
use crate::pool::{HeightPools, TerminalPool};
use crate::stats::BuildStats;

/// One build of a minimal classifier automaton.
///
/// Samples are merged one at a time; after every insert the automaton is
/// minimal and classifies all words inserted so far. [`finish`](Self::finish)
/// consumes the session and produces the flat table.
///
/// ```
/// use flatdfa_build::{BuildOptions, DfaBuilder};
/// use flatdfa_core::Shape;
///
/// let shape = Shape::new(2, 2).unwrap();
/// let mut builder = DfaBuilder::new(shape, BuildOptions::default());
/// builder.insert_word(&[0, 1], 20).unwrap();
/// builder.insert_word(&[1, 0], 20).unwrap();
/// let table = builder.finish().unwrap();
/// assert_eq!(table.lookup(&[1, 0]).unwrap(), Some(20));
/// assert_eq!(table.lookup(&[1, 1]).unwrap(), None);
/// ```
pub struct DfaBuilder {
    pub(crate) shape: Shape,
    pub(crate) options: BuildOptions,
    pub(crate) graph: Graph,
    pub(crate) pools: HeightPools,
    pub(crate) terminals: TerminalPool,
    pub(crate) root: StateId,
    pub(crate) stats: BuildStats,
}

impl std::fmt::Debug for DfaBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DfaBuilder")
            .field("shape", &self.shape)
            .field("duplicates", &self.options.duplicates)
            .field("canonical_states", &self.pools.total())
            .field("distinct_values", &self.terminals.value_count())
            .finish()
    }
}

impl DfaBuilder {
    /// Start a build. The start state is registered at height `word_length`.
    pub fn new(shape: Shape, options: BuildOptions) -> Self {
        let mut graph = Graph::new(shape.alphabet_size());
        let mut pools = HeightPools::new(shape.word_length());
        let root = graph.add_state();
        pools.insert(shape.word_length(), &graph, root);
        Self {
            shape,
            options,
            graph,
            pools,
            terminals: TerminalPool::default(),
            root,
            stats: BuildStats::default(),
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Merge one sample. Invalid words are rejected before the graph changes.
    pub fn insert(&mut self, sample: &Sample) -> Result<(), BuildError> {
        self.insert_word(&sample.word, sample.value)
    }

    /// Merge `word -> value`.
    pub fn insert_word(&mut self, word: &[Symbol], value: Value) -> Result<(), BuildError> {
        match self.merge_word(word, value)? {
            MergeOutcome::Inserted => self.stats.samples_merged += 1,
            MergeOutcome::Duplicate => self.stats.duplicates_skipped += 1,
            MergeOutcome::ConflictIgnored => self.stats.conflicts_ignored += 1,
        }
        Ok(())
    }

    /// Merge every sample, stopping at the first error.
    pub fn insert_all<'a, I>(&mut self, samples: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        for sample in samples {
            self.insert(sample)?;
        }
        Ok(())
    }

    /// Terminal state the walk for `word` ends in, if the word is present.
    ///
    /// Words with the same value end in the same terminal.
    pub fn terminal_of(&self, word: &[Symbol]) -> Option<StateId> {
        if self.shape.check_word(word).is_err() {
            return None;
        }
        self.walk(word)
    }

    /// Terminal state interned for `value`, if any word produced it.
    pub fn terminal_for(&self, value: Value) -> Option<StateId> {
        self.terminals.get(value)
    }

    /// Value stored for `word`, if it is present.
    pub fn value_of(&self, word: &[Symbol]) -> Option<Value> {
        self.terminal_of(word).map(|t| self.graph.value(t))
    }

    /// Number of distinct values inserted so far.
    pub fn value_count(&self) -> usize {
        self.terminals.value_count()
    }

    /// Number of canonical inner states, start state included.
    pub fn state_count(&self) -> usize {
        self.pools.total()
    }

    pub fn stats(&self) -> BuildStats {
        BuildStats {
            distinct_values: self.terminals.value_count(),
            states_per_height: self.pools.counts(),
            live_states: self.graph.live_count(),
            free_slots: self.graph.free_count(),
            ..self.stats.clone()
        }
    }

    /// Compact the automaton into a flat table, ending the build.
    pub fn finish(self) -> Result<TransitionTable, BuildError> {
        let stats = self.stats();
        debug!(%stats, "compacting automaton");

        let compacted = compact::compact_transitions(&self.graph, self.root, self.shape)?;
        debug_assert_eq!(
            compacted.states_per_height,
            stats.states_per_height,
            "compaction disagrees with the canonical pools"
        );

        let table =
            TransitionTable::new(self.shape, compacted.transitions, compacted.result_indexes)?;
        debug!(
            states = table.state_count(),
            slots = table.slot_count(),
            results = table.result_count(),
            "table ready"
        );
        Ok(table)
    }

    /// Follow `word` from the start state as far as the graph allows.
    pub(crate) fn walk(&self, word: &[Symbol]) -> Option<StateId> {
        word.iter()
            .try_fold(self.root, |state, &symbol| self.graph.next(state, symbol))
    }
}
