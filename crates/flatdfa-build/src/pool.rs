// Hash-consing pools: one canonical state per signature and height, one
// terminal per value.

use flatdfa_core::Value;
use hashbrown::HashMap;

use crate::graph::{Graph, StateId};

/// Canonical states, stratified by height.
///
/// A state's signature is its slice of outgoing slots. Because a state's
/// children are always canonical before the state itself is registered, equal
/// signatures at the same height mean equal sub-automata. No two states in one
/// height's map ever share a signature.
///
/// A registered state must be removed before its slots change and registered
/// again afterwards.
pub struct HeightPools {
    /// Indexed by height; index 0 is unused (terminals live in [`TerminalPool`]).
    pools: Vec<HashMap<Box<[Option<StateId>]>, StateId>>,
}

impl HeightPools {
    pub fn new(word_length: usize) -> Self {
        Self {
            pools: (0..=word_length).map(|_| HashMap::new()).collect(),
        }
    }

    /// The canonical state with this signature at `height`, if any.
    pub fn find(&self, height: usize, signature: &[Option<StateId>]) -> Option<StateId> {
        self.pools[height].get(signature).copied()
    }

    /// Register `id` under its current signature.
    pub fn insert(&mut self, height: usize, graph: &Graph, id: StateId) {
        let previous = self.pools[height].insert(graph.transitions(id).into(), id);
        debug_assert!(
            previous.is_none_or(|p| p == id),
            "duplicate signature at height {height}"
        );
    }

    /// Unregister `id` using its current signature.
    ///
    /// Returns `false` when `id` was not the registered state for it.
    pub fn remove(&mut self, height: usize, graph: &Graph, id: StateId) -> bool {
        let pool = &mut self.pools[height];
        match pool.get(graph.transitions(id)) {
            Some(&registered) if registered == id => {
                pool.remove(graph.transitions(id));
                true
            }
            _ => false,
        }
    }

    /// Canonical state counts indexed by height (index 0 always 0).
    pub fn counts(&self) -> Vec<usize> {
        self.pools.iter().map(HashMap::len).collect()
    }

    pub fn total(&self) -> usize {
        self.pools.iter().map(HashMap::len).sum()
    }
}

/// Terminal states interned by value.
#[derive(Default)]
pub struct TerminalPool {
    by_value: HashMap<Value, StateId>,
}

impl TerminalPool {
    /// The terminal for `value`, allocated on first use.
    pub fn get_or_insert(&mut self, graph: &mut Graph, value: Value) -> StateId {
        *self
            .by_value
            .entry(value)
            .or_insert_with(|| graph.add_terminal(value))
    }

    pub fn get(&self, value: Value) -> Option<StateId> {
        self.by_value.get(&value).copied()
    }

    /// Number of distinct values seen so far.
    pub fn value_count(&self) -> usize {
        self.by_value.len()
    }
}
