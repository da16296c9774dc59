// Training pairs: a word and the value the table must return for it.

use serde::{Deserialize, Serialize};

use crate::{Symbol, Value};

/// A word together with its classification value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub word: Vec<Symbol>,
    pub value: Value,
}

impl Sample {
    pub fn new(word: impl Into<Vec<Symbol>>, value: Value) -> Self {
        Self {
            word: word.into(),
            value,
        }
    }
}

impl<W: Into<Vec<Symbol>>> From<(W, Value)> for Sample {
    fn from((word, value): (W, Value)) -> Self {
        Self::new(word, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tuple() {
        let sample: Sample = (vec![0, 1, 2], 7).into();
        assert_eq!(sample.word, vec![0, 1, 2]);
        assert_eq!(sample.value, 7);
    }

    #[test]
    fn from_array_tuple() {
        let sample = Sample::from(([1u32, 1], -3));
        assert_eq!(sample, Sample::new(vec![1, 1], -3));
    }
}
