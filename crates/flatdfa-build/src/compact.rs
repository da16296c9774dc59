// Compaction: number canonical states level by level and lay them out as rows.

use bit_set::BitSet;
use flatdfa_core::{NULL_TRANSITION, Shape};

use crate::BuildError;
use crate::graph::{Graph, StateId};

/// Flat rows of a compacted automaton.
pub(crate) struct Compacted {
    pub transitions: Vec<i32>,
    /// Slots of the last level that hold a classification value.
    pub result_indexes: BitSet,
    /// Rows per height; index 0 is always 0.
    pub states_per_height: Vec<usize>,
}

const UNNUMBERED: u32 = u32::MAX;

/// Assign dense ids breadth-first and emit one row per state.
///
/// The start state gets id 0. Within a level, children are numbered in the
/// order their parents were numbered, scanning symbols in ascending order, so
/// the layout depends only on the automaton and not on how it was built.
pub(crate) fn compact_transitions(
    graph: &Graph,
    root: StateId,
    shape: Shape,
) -> Result<Compacted, BuildError> {
    let alphabet_size = shape.alphabet_size();
    let word_length = shape.word_length();

    let mut ids = vec![UNNUMBERED; graph.capacity()];
    let mut order: Vec<StateId> = vec![root];
    ids[root.index()] = 0;

    let mut states_per_height = vec![0; word_length + 1];
    let mut level_start = 0;
    for depth in 0..word_length {
        let level_end = order.len();
        states_per_height[word_length - depth] = level_end - level_start;
        if depth + 1 == word_length {
            break;
        }
        for position in level_start..level_end {
            let state = order[position];
            for &child in graph.transitions(state).iter().flatten() {
                if ids[child.index()] == UNNUMBERED {
                    ids[child.index()] = order.len() as u32;
                    order.push(child);
                }
            }
        }
        level_start = level_end;
    }

    let states = order.len();
    if (states - 1)
        .checked_mul(alphabet_size)
        .is_none_or(|max| max > i32::MAX as usize)
    {
        return Err(BuildError::TableTooLarge {
            states,
            alphabet_size,
        });
    }

    let mut transitions = Vec::with_capacity(states * alphabet_size);
    let mut result_indexes = BitSet::with_capacity(states * alphabet_size);
    for (id, &state) in order.iter().enumerate() {
        let last_level = id >= level_start;
        for slot in graph.transitions(state) {
            let entry = match slot {
                None => NULL_TRANSITION,
                Some(target) if last_level => {
                    result_indexes.insert(transitions.len());
                    graph.value(*target)
                }
                Some(target) => (ids[target.index()] as usize * alphabet_size) as i32,
            };
            transitions.push(entry);
        }
    }

    Ok(Compacted {
        transitions,
        result_indexes,
        states_per_height,
    })
}
