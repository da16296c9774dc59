// Word shape: alphabet size and word length shared by every word of a build.

use crate::{Sample, Symbol, WordError};

/// Alphabet size and word length of one table.
///
/// Every word inserted into a builder, and every word looked up in the
/// resulting table, must have exactly `word_length` symbols, each in
/// `0..alphabet_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    alphabet_size: usize,
    word_length: usize,
}

impl Shape {
    /// Create a shape, rejecting an empty alphabet or zero-length words.
    pub fn new(alphabet_size: usize, word_length: usize) -> Result<Self, WordError> {
        if alphabet_size == 0 {
            return Err(WordError::EmptyAlphabet);
        }
        if word_length == 0 {
            return Err(WordError::EmptyWord);
        }
        Ok(Self {
            alphabet_size,
            word_length,
        })
    }

    /// Infer a shape from a batch of samples.
    ///
    /// The word length is taken from the first sample and the alphabet size is
    /// one more than the largest symbol seen anywhere in the batch. Words of a
    /// different length are not rejected here; they fail validation on insert.
    pub fn infer<'a, I>(samples: I) -> Result<Self, WordError>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let mut iter = samples.into_iter();
        let first = iter.next().ok_or(WordError::NoSamples)?;
        let word_length = first.word.len();
        let max_symbol = std::iter::once(first)
            .chain(iter)
            .flat_map(|s| s.word.iter().copied())
            .max()
            .unwrap_or(0);
        Self::new(max_symbol as usize + 1, word_length)
    }

    #[inline]
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    #[inline]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Check that `word` has the right length and only in-range symbols.
    pub fn check_word(&self, word: &[Symbol]) -> Result<(), WordError> {
        if word.len() != self.word_length {
            return Err(WordError::WrongLength {
                expected: self.word_length,
                actual: word.len(),
            });
        }
        if let Some((position, &symbol)) = word
            .iter()
            .enumerate()
            .find(|(_, s)| **s as usize >= self.alphabet_size)
        {
            return Err(WordError::SymbolOutOfRange {
                position,
                symbol,
                alphabet_size: self.alphabet_size,
            });
        }
        Ok(())
    }

    /// Number of distinct words of this shape, or `None` on overflow.
    pub fn word_count(&self) -> Option<usize> {
        let exp = u32::try_from(self.word_length).ok()?;
        self.alphabet_size.checked_pow(exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_empty_alphabet() {
        assert_eq!(Shape::new(0, 3), Err(WordError::EmptyAlphabet));
    }

    #[test]
    fn reject_zero_length() {
        assert_eq!(Shape::new(4, 0), Err(WordError::EmptyWord));
    }

    #[test]
    fn check_valid_word() {
        let shape = Shape::new(3, 4).unwrap();
        assert!(shape.check_word(&[0, 1, 2, 0]).is_ok());
    }

    #[test]
    fn check_wrong_length() {
        let shape = Shape::new(3, 4).unwrap();
        assert_eq!(
            shape.check_word(&[0, 1]),
            Err(WordError::WrongLength {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn check_symbol_out_of_range() {
        let shape = Shape::new(3, 3).unwrap();
        assert_eq!(
            shape.check_word(&[0, 3, 1]),
            Err(WordError::SymbolOutOfRange {
                position: 1,
                symbol: 3,
                alphabet_size: 3
            })
        );
    }

    #[test]
    fn infer_from_samples() {
        let samples = vec![
            Sample::new(vec![0, 1, 0], 1),
            Sample::new(vec![4, 0, 2], 2),
            Sample::new(vec![1, 1, 1], 3),
        ];
        let shape = Shape::infer(&samples).unwrap();
        assert_eq!(shape.alphabet_size(), 5);
        assert_eq!(shape.word_length(), 3);
    }

    #[test]
    fn infer_empty_batch() {
        let samples: Vec<Sample> = Vec::new();
        assert_eq!(Shape::infer(&samples), Err(WordError::NoSamples));
    }

    #[test]
    fn infer_single_zero_word() {
        let samples = vec![Sample::new(vec![0, 0], 9)];
        let shape = Shape::infer(&samples).unwrap();
        assert_eq!(shape.alphabet_size(), 1);
        assert_eq!(shape.word_length(), 2);
    }

    #[test]
    fn word_count() {
        assert_eq!(Shape::new(5, 3).unwrap().word_count(), Some(125));
        assert_eq!(Shape::new(usize::MAX, 2).unwrap().word_count(), None);
    }
}
