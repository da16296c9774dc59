// Build verification: sample round trips and per-height minimality.

use flatdfa_core::{Sample, Symbol, Value, WordError};
use hashbrown::HashMap;

use crate::TransitionTable;

/// A property a finished table failed to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("invalid sample word: {0}")]
    Word(#[from] WordError),
    #[error("word {word:?} classifies as {actual:?}, expected {expected}")]
    Mismatch {
        word: Vec<Symbol>,
        expected: Value,
        actual: Option<Value>,
    },
    #[error("states {first} and {second} at height {height} have identical transitions")]
    DuplicateState {
        height: usize,
        first: usize,
        second: usize,
    },
}

impl TransitionTable {
    /// Check that every sample classifies to its own value.
    pub fn check_samples<'a, I>(&self, samples: I) -> Result<(), VerifyError>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        for sample in samples {
            let actual = self.lookup(&sample.word)?;
            if actual != Some(sample.value) {
                return Err(VerifyError::Mismatch {
                    word: sample.word.clone(),
                    expected: sample.value,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Check that no two states at the same height have the same row.
    ///
    /// Rows are compared slot by slot, distinguishing null slots from result
    /// slots that store the sentinel value. Because child offsets are dense
    /// ids, equal rows mean equal sub-automata.
    pub fn check_minimal(&self) -> Result<(), VerifyError> {
        let alphabet_size = self.alphabet_size();
        for height in 1..=self.word_length() {
            let states = self.states_at_height(height);
            let mut seen: HashMap<Vec<Option<i32>>, usize> = HashMap::with_capacity(states.len());
            for state in states {
                let base = state * alphabet_size;
                let row: Vec<Option<i32>> = (base..base + alphabet_size)
                    .map(|index| (!self.is_null(index)).then(|| self.transitions()[index]))
                    .collect();
                if let Some(&first) = seen.get(&row) {
                    return Err(VerifyError::DuplicateState {
                        height,
                        first,
                        second: state,
                    });
                }
                seen.insert(row, state);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bit_set::BitSet;
    use flatdfa_core::Shape;

    use super::*;

    fn table(alphabet_size: usize, word_length: usize, transitions: Vec<i32>, results: &[usize]) -> TransitionTable {
        let shape = Shape::new(alphabet_size, word_length).unwrap();
        let results: BitSet = results.iter().copied().collect();
        TransitionTable::new(shape, transitions, results).unwrap()
    }

    #[test]
    fn samples_round_trip() {
        let t = table(2, 2, vec![2, 4, 10, 20, 20, 30], &[2, 3, 4, 5]);
        let samples = vec![
            Sample::new(vec![0, 0], 10),
            Sample::new(vec![0, 1], 20),
            Sample::new(vec![1, 0], 20),
            Sample::new(vec![1, 1], 30),
        ];
        assert_eq!(t.check_samples(&samples), Ok(()));
    }

    #[test]
    fn sample_with_wrong_value() {
        let t = table(2, 2, vec![2, 4, 10, 20, 20, 30], &[2, 3, 4, 5]);
        let samples = vec![Sample::new(vec![1, 0], 21)];
        assert_eq!(
            t.check_samples(&samples),
            Err(VerifyError::Mismatch {
                word: vec![1, 0],
                expected: 21,
                actual: Some(20),
            })
        );
    }

    #[test]
    fn sample_missing_from_table() {
        let t = table(2, 2, vec![-1, 2, -1, 7], &[3]);
        let samples = vec![Sample::new(vec![0, 1], 7)];
        assert!(matches!(
            t.check_samples(&samples),
            Err(VerifyError::Mismatch { actual: None, .. })
        ));
    }

    #[test]
    fn sample_with_bad_shape() {
        let t = table(2, 2, vec![-1, 2, -1, 7], &[3]);
        let samples = vec![Sample::new(vec![1, 1, 1], 7)];
        assert!(matches!(
            t.check_samples(&samples),
            Err(VerifyError::Word(WordError::WrongLength { .. }))
        ));
    }

    #[test]
    fn minimal_table_passes() {
        let t = table(2, 2, vec![2, 4, 10, 20, 20, 30], &[2, 3, 4, 5]);
        assert_eq!(t.check_minimal(), Ok(()));
    }

    #[test]
    fn duplicate_rows_fail() {
        // Both children of the root classify 0 -> 5, 1 -> 6.
        let t = table(2, 2, vec![2, 4, 5, 6, 5, 6], &[2, 3, 4, 5]);
        assert_eq!(
            t.check_minimal(),
            Err(VerifyError::DuplicateState {
                height: 1,
                first: 1,
                second: 2,
            })
        );
    }

    #[test]
    fn sentinel_result_differs_from_null() {
        // state 1: slot 0 is a result holding -1; state 2: slot 0 is null.
        let t = table(2, 2, vec![2, 4, -1, 3, -1, 3], &[2, 3, 5]);
        assert_eq!(t.check_minimal(), Ok(()));
    }
}
