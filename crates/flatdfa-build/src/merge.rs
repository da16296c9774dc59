// Incremental merge of one word into a minimal layered automaton.
//
// Every word has the same length, so a state's height (symbols left until the
// end of the word) never changes and minimization works per height. Merging a
// word proceeds in phases:
//
// 1. Walk the prefix of states reachable by exactly one path (monofluent).
// 2. Unregister the last of them; its outgoing slot is about to change.
// 3. Clone every shared state the rest of the existing path runs through.
// 4. Append fresh states for the missing suffix, ending in the value's
//    terminal.
// 5. Bottom-up, replace each cloned or fresh state by an equal canonical
//    state, or register it.
// 6. Bottom-up over the monofluent prefix, do the same; stop at the first
//    state that stays unique, everything above it is untouched.

use flatdfa_core::{Symbol, Value};
use tracing::{trace, warn};

use crate::BuildError;
use crate::builder::DfaBuilder;
use crate::graph::StateId;
use crate::options::DuplicatePolicy;

/// What a merge did to the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeOutcome {
    /// The word was new and has been added.
    Inserted,
    /// The word was already present with the same value.
    Duplicate,
    /// The word was present with another value, which was kept.
    ConflictIgnored,
}

impl DfaBuilder {
    pub(crate) fn merge_word(
        &mut self,
        word: &[Symbol],
        value: Value,
    ) -> Result<MergeOutcome, BuildError> {
        self.shape.check_word(word)?;
        let word_length = word.len();

        if let Some(terminal) = self.walk(word) {
            let existing = self.graph.value(terminal);
            if existing == value {
                return Ok(MergeOutcome::Duplicate);
            }
            return match self.options.duplicates {
                DuplicatePolicy::Reject => Err(BuildError::Conflict {
                    word: word.to_vec(),
                    existing,
                    rejected: value,
                }),
                DuplicatePolicy::FirstWins => {
                    warn!(?word, existing, ignored = value, "conflicting value ignored");
                    Ok(MergeOutcome::ConflictIgnored)
                }
            };
        }

        // prefix[d] is the state at depth d; each is reachable by one path only.
        let mut prefix: Vec<StateId> = vec![self.root];
        let mut tail = self.root;
        while prefix.len() < word_length {
            match self.graph.next(tail, word[prefix.len() - 1]) {
                Some(child) if !self.graph.is_confluence(child) => {
                    prefix.push(child);
                    tail = child;
                }
                _ => break,
            }
        }
        let split_depth = prefix.len() - 1;
        self.pools.remove(word_length - split_depth, &self.graph, tail);

        // fresh[i] sits at depth split_depth + 1 + i.
        let mut fresh: Vec<StateId> = Vec::new();
        let mut depth = split_depth;

        while depth + 1 < word_length {
            let Some(shared) = self.graph.next(tail, word[depth]) else {
                break;
            };
            let copy = self.graph.clone_state(shared);
            self.graph.set_edge(tail, word[depth], copy);
            self.stats.states_cloned += 1;
            fresh.push(copy);
            tail = copy;
            depth += 1;
        }

        while depth + 1 < word_length {
            let state = self.graph.add_state();
            self.graph.set_edge(tail, word[depth], state);
            self.stats.states_created += 1;
            fresh.push(state);
            tail = state;
            depth += 1;
        }

        let terminal = self.terminals.get_or_insert(&mut self.graph, value);
        self.graph.set_edge(tail, word[depth], terminal);

        for i in (0..fresh.len()).rev() {
            let state = fresh[i];
            let depth = split_depth + 1 + i;
            let parent = if i == 0 { prefix[split_depth] } else { fresh[i - 1] };
            let height = word_length - depth;
            match self.pools.find(height, self.graph.transitions(state)) {
                Some(existing) => {
                    self.graph.set_edge(parent, word[depth - 1], existing);
                    self.graph.release(state);
                    self.stats.states_collapsed += 1;
                }
                None => self.pools.insert(height, &self.graph, state),
            }
        }

        // prefix[depth] is unregistered at the top of every iteration.
        let mut depth = split_depth;
        loop {
            let state = prefix[depth];
            let height = word_length - depth;
            if depth == 0 {
                self.pools.insert(height, &self.graph, state);
                break;
            }
            let Some(existing) = self.pools.find(height, self.graph.transitions(state)) else {
                self.pools.insert(height, &self.graph, state);
                break;
            };
            let parent = prefix[depth - 1];
            self.pools.remove(height + 1, &self.graph, parent);
            self.graph.set_edge(parent, word[depth - 1], existing);
            self.graph.release(state);
            self.stats.states_collapsed += 1;
            depth -= 1;
        }

        trace!(?word, value, split_depth, fresh = fresh.len(), "merged word");
        Ok(MergeOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use flatdfa_core::Shape;

    use crate::BuildError;
    use crate::builder::DfaBuilder;
    use crate::options::{BuildOptions, DuplicatePolicy};

    fn builder(alphabet_size: usize, word_length: usize) -> DfaBuilder {
        DfaBuilder::new(
            Shape::new(alphabet_size, word_length).unwrap(),
            BuildOptions::default(),
        )
    }

    #[test_log::test]
    fn single_word_is_a_chain() {
        let mut b = builder(3, 4);
        b.insert_word(&[2, 0, 1, 1], 7).unwrap();
        assert_eq!(b.state_count(), 4);
        assert_eq!(b.stats().states_per_height, vec![0, 1, 1, 1, 1]);
        assert_eq!(b.value_of(&[2, 0, 1, 1]), Some(7));
    }

    #[test_log::test]
    fn common_suffix_is_shared() {
        // 0ab and 1ab share the tail after the first symbol.
        let mut b = builder(2, 3);
        b.insert_word(&[0, 1, 1], 5).unwrap();
        b.insert_word(&[1, 1, 1], 5).unwrap();
        // root + one shared height-2 state + one height-1 state
        assert_eq!(b.state_count(), 3);
        let stats = b.stats();
        assert_eq!(stats.states_per_height, vec![0, 1, 1, 1]);
        assert_eq!(stats.states_collapsed, 2);
    }

    #[test_log::test]
    fn confluence_state_is_cloned_not_edited() {
        let mut b = builder(2, 3);
        b.insert_word(&[0, 0, 0], 1).unwrap();
        b.insert_word(&[1, 0, 0], 1).unwrap();
        // The height-2 state is now shared by both first symbols.
        b.insert_word(&[1, 0, 1], 2).unwrap();

        assert_eq!(b.value_of(&[0, 0, 0]), Some(1));
        assert_eq!(b.value_of(&[1, 0, 0]), Some(1));
        assert_eq!(b.value_of(&[1, 0, 1]), Some(2));
        assert_eq!(b.value_of(&[0, 0, 1]), None);
        assert!(b.stats().states_cloned >= 1);
    }

    #[test_log::test]
    fn prefix_collapses_after_suffix_change() {
        let mut b = builder(2, 2);
        b.insert_word(&[0, 0], 1).unwrap();
        b.insert_word(&[1, 1], 1).unwrap();
        assert_eq!(b.state_count(), 3);
        // Completing both rows makes the two height-1 states identical.
        b.insert_word(&[0, 1], 1).unwrap();
        b.insert_word(&[1, 0], 1).unwrap();
        assert_eq!(b.state_count(), 2);
        assert_eq!(b.stats().states_per_height, vec![0, 1, 1]);
    }

    #[test_log::test]
    fn duplicate_is_a_no_op() {
        let mut b = builder(3, 3);
        b.insert_word(&[0, 1, 2], 4).unwrap();
        b.insert_word(&[2, 1, 0], 4).unwrap();
        let before = b.stats();
        b.insert_word(&[2, 1, 0], 4).unwrap();
        let after = b.stats();
        assert_eq!(after.states_per_height, before.states_per_height);
        assert_eq!(after.live_states, before.live_states);
        assert_eq!(after.duplicates_skipped, 1);
    }

    #[test]
    fn conflict_is_rejected_by_default() {
        let mut b = builder(2, 2);
        b.insert_word(&[1, 0], 3).unwrap();
        let err = b.insert_word(&[1, 0], 4).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Conflict {
                existing: 3,
                rejected: 4,
                ..
            }
        ));
        assert_eq!(b.value_of(&[1, 0]), Some(3));
    }

    #[test_log::test]
    fn conflict_first_wins() {
        let mut b = DfaBuilder::new(
            Shape::new(2, 2).unwrap(),
            BuildOptions::default().with_duplicates(DuplicatePolicy::FirstWins),
        );
        b.insert_word(&[1, 0], 3).unwrap();
        b.insert_word(&[1, 0], 4).unwrap();
        assert_eq!(b.value_of(&[1, 0]), Some(3));
        assert_eq!(b.value_count(), 1);
    }

    #[test]
    fn invalid_word_leaves_graph_untouched() {
        let mut b = builder(2, 3);
        b.insert_word(&[0, 1, 0], 1).unwrap();
        let before = b.stats();

        assert!(matches!(
            b.insert_word(&[0, 1], 1),
            Err(BuildError::Word(_))
        ));
        assert!(matches!(
            b.insert_word(&[0, 2, 0], 1),
            Err(BuildError::Word(_))
        ));
        assert_eq!(b.stats(), before);
    }

    #[test_log::test]
    fn root_prefix_only() {
        // Word length 1: every word ends right after the root.
        let mut b = builder(4, 1);
        b.insert_word(&[3], 9).unwrap();
        b.insert_word(&[0], 9).unwrap();
        b.insert_word(&[1], -1).unwrap();
        assert_eq!(b.state_count(), 1);
        assert_eq!(b.value_count(), 2);
        assert_eq!(b.value_of(&[1]), Some(-1));
        assert_eq!(b.value_of(&[2]), None);
    }

    #[test_log::test]
    fn freed_slots_are_reused() {
        let mut b = builder(3, 4);
        for a in 0..3 {
            for c in 0..3 {
                b.insert_word(&[a, 1, c, 2], 0).unwrap();
            }
        }
        let stats = b.stats();
        // Everything with the same middle collapses to one chain per height.
        assert_eq!(stats.states_per_height, vec![0, 1, 1, 1, 1]);
        // root, three inner states and one terminal
        assert_eq!(stats.live_states, 5);
        assert!(stats.free_slots > 0);
    }
}
